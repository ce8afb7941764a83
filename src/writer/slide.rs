//! Slide part generation.

use crate::error::{Error, Result};
use crate::model::{BulletLine, Slide};
use crate::template::{Layout, Region};
use crate::xml::{escape_xml, sanitize_text};
use std::fmt::Write as FmtWrite;

/// What a cloned placeholder receives.
enum Fill<'a> {
    Title(&'a str),
    Bullets(&'a [BulletLine]),
    Empty,
}

/// Generate the XML for `slide`, cloning the placeholders of `layout`.
pub fn slide_xml(slide: &Slide, layout: &Layout) -> Result<String> {
    let mut xml = String::with_capacity(2048 + slide.bullets.len() * 160);

    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push_str(r#"<p:sld xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" "#);
    xml.push_str(r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" "#);
    xml.push_str(r#"xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main">"#);
    xml.push_str("<p:cSld><p:spTree>");
    xml.push_str(r#"<p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>"#);
    xml.push_str(r#"<p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/><a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr>"#);

    for (i, region) in layout.regions.iter().enumerate() {
        let fill = if Some(i) == slide.title_region {
            Fill::Title(&slide.title)
        } else if Some(i) == slide.body_region {
            Fill::Bullets(&slide.bullets)
        } else {
            Fill::Empty
        };
        // id 1 is the group shape
        write_placeholder(&mut xml, region, i as u32 + 2, fill)?;
    }

    xml.push_str("</p:spTree></p:cSld>");
    xml.push_str("<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>");
    xml.push_str("</p:sld>");
    Ok(xml)
}

fn write_placeholder(xml: &mut String, region: &Region, shape_id: u32, fill: Fill<'_>) -> Result<()> {
    let fmt_err = |e: std::fmt::Error| Error::Serialization(e.to_string());

    xml.push_str("<p:sp><p:nvSpPr>");
    write!(
        xml,
        r#"<p:cNvPr id="{}" name="{}"/>"#,
        shape_id,
        escape_xml(&region.name)
    )
    .map_err(fmt_err)?;
    xml.push_str(r#"<p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr><p:nvPr><p:ph"#);
    if let Some(ph_type) = region.kind.as_ooxml() {
        write!(xml, r#" type="{}""#, ph_type).map_err(fmt_err)?;
    }
    if let Some(idx) = region.idx {
        write!(xml, r#" idx="{}""#, idx).map_err(fmt_err)?;
    }
    xml.push_str("/></p:nvPr></p:nvSpPr><p:spPr/>");

    if region.has_text_frame || !matches!(fill, Fill::Empty) {
        xml.push_str("<p:txBody><a:bodyPr/><a:lstStyle/>");
        match fill {
            Fill::Title(text) => {
                write!(
                    xml,
                    r#"<a:p><a:r><a:rPr lang="en-US" dirty="0"/><a:t>{}</a:t></a:r></a:p>"#,
                    escape_xml(&sanitize_text(text))
                )
                .map_err(fmt_err)?;
            }
            Fill::Bullets(bullets) if !bullets.is_empty() => {
                for bullet in bullets {
                    write_bullet(xml, bullet).map_err(fmt_err)?;
                }
            }
            _ => xml.push_str(r#"<a:p><a:endParaRPr lang="en-US" dirty="0"/></a:p>"#),
        }
        xml.push_str("</p:txBody>");
    }

    xml.push_str("</p:sp>");
    Ok(())
}

fn write_bullet(xml: &mut String, bullet: &BulletLine) -> std::fmt::Result {
    let sz = bullet.font_size.as_centipoints();
    xml.push_str("<a:p>");
    if bullet.level > 0 {
        write!(xml, r#"<a:pPr lvl="{}"/>"#, bullet.level)?;
    }
    let text = sanitize_text(&bullet.text);
    if text.is_empty() {
        write!(xml, r#"<a:endParaRPr lang="en-US" sz="{}" dirty="0"/>"#, sz)?;
    } else {
        write!(
            xml,
            r#"<a:r><a:rPr lang="en-US" sz="{}" dirty="0"/><a:t>{}</a:t></a:r>"#,
            sz,
            escape_xml(&text)
        )?;
    }
    xml.push_str("</a:p>");
    Ok(())
}
