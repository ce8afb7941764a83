//! Layout discovery in a PresentationML package.

use super::{Layout, PlaceholderKind, Region};
use crate::container::{rel_types, targets_by_id, OoxmlContainer};
use crate::error::{Error, Result};
use crate::xml::local_name;
use quick_xml::events::{BytesStart, Event};

/// What the loader found in a package.
pub(super) struct Discovered {
    pub presentation_part: String,
    pub layouts: Vec<Layout>,
}

/// Walk package → presentation → first slide master → its layouts.
pub(super) fn discover(package: &OoxmlContainer) -> Result<Discovered> {
    let package_rels = package.read_package_relationships()?;
    let presentation_part = package_rels
        .get_by_type(rel_types::OFFICE_DOCUMENT)
        .first()
        .map(|r| OoxmlContainer::resolve_path("", &r.target))
        .ok_or_else(|| Error::MissingComponent("officeDocument relationship".to_string()))?;

    let presentation_xml = package.read_xml(&presentation_part)?;
    let presentation_rels = package.read_relationships(&presentation_part)?;

    let master_ids = collect_rel_ids(&presentation_xml, b"sldMasterId")?;
    let master_target = master_ids
        .iter()
        .find_map(|id| presentation_rels.get(id))
        .or_else(|| presentation_rels.get_by_type(rel_types::SLIDE_MASTER).into_iter().next())
        .map(|r| r.target.clone())
        .ok_or_else(|| Error::InvalidData("template has no slide master".to_string()))?;
    let master_part = OoxmlContainer::resolve_path(&presentation_part, &master_target);

    let master_xml = package.read_xml(&master_part)?;
    let master_rels = package.read_relationships(&master_part)?;
    let targets = targets_by_id(&master_rels);

    let mut layout_targets: Vec<String> = collect_rel_ids(&master_xml, b"sldLayoutId")?
        .iter()
        .filter_map(|id| targets.get(id.as_str()).map(|t| t.to_string()))
        .collect();
    if layout_targets.is_empty() {
        layout_targets = master_rels
            .get_by_type(rel_types::SLIDE_LAYOUT)
            .into_iter()
            .map(|r| r.target.clone())
            .collect();
    }

    let mut layouts = Vec::with_capacity(layout_targets.len());
    for target in layout_targets {
        let part_name = OoxmlContainer::resolve_path(&master_part, &target);
        let xml = package.read_xml(&part_name)?;
        let (name, regions) = parse_layout(&xml)?;
        log::debug!(
            "event=layout_discovered part={} name={:?} regions={}",
            part_name,
            name,
            regions.len()
        );
        layouts.push(Layout {
            name,
            part_name,
            regions,
        });
    }

    Ok(Discovered {
        presentation_part,
        layouts,
    })
}

/// Relationship ids (`r:id`) of every element with the given local name.
fn collect_rel_ids(xml: &str, element: &[u8]) -> Result<Vec<String>> {
    let mut ids = Vec::new();
    let mut reader = quick_xml::Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Empty(e)) | Ok(Event::Start(e))
                if e.local_name().as_ref() == element =>
            {
                for attr in e.attributes().flatten() {
                    let key = attr.key.as_ref();
                    // r:id, not the plain numeric id
                    if key != b"id" && local_name(key) == b"id" {
                        ids.push(String::from_utf8_lossy(&attr.value).into_owned());
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::XmlParse(e.to_string())),
            _ => {}
        }
        buf.clear();
    }

    Ok(ids)
}

#[derive(Default)]
struct PendingShape {
    name: String,
    placeholder: Option<(PlaceholderKind, Option<u32>)>,
    has_text_frame: bool,
}

/// Accumulates layout state while streaming its XML.
#[derive(Default)]
struct LayoutScan {
    name: String,
    regions: Vec<Region>,
    current: Option<PendingShape>,
}

impl LayoutScan {
    fn open(&mut self, e: &BytesStart<'_>, empty: bool) {
        match e.local_name().as_ref() {
            b"cSld" => {
                if let Some(name) = attr_value(e, b"name") {
                    self.name = name;
                }
            }
            // An empty <p:sp/> has no placeholder to record
            b"sp" if !empty => self.current = Some(PendingShape::default()),
            b"cNvPr" => {
                if let (Some(shape), Some(name)) = (self.current.as_mut(), attr_value(e, b"name")) {
                    shape.name = name;
                }
            }
            b"ph" => {
                if let Some(shape) = self.current.as_mut() {
                    let ph_type = attr_value(e, b"type");
                    let idx = attr_value(e, b"idx").and_then(|v| v.parse().ok());
                    shape.placeholder = Some((PlaceholderKind::from_ooxml(ph_type.as_deref()), idx));
                }
            }
            b"txBody" => {
                if let Some(shape) = self.current.as_mut() {
                    shape.has_text_frame = true;
                }
            }
            _ => {}
        }
    }

    fn close_shape(&mut self) {
        let Some(shape) = self.current.take() else {
            return;
        };
        let Some((kind, idx)) = shape.placeholder else {
            return;
        };
        if !kind.is_cloned_to_slide() {
            return;
        }

        let mut region = Region::new(kind, idx);
        if !shape.name.is_empty() {
            region.name = shape.name;
        }
        region.has_text_frame = shape.has_text_frame;
        self.regions.push(region);
    }
}

fn attr_value(e: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.as_ref() == key)
        .map(|a| {
            a.unescape_value()
                .map(|v| v.into_owned())
                .unwrap_or_else(|_| String::from_utf8_lossy(&a.value).into_owned())
        })
}

/// Parse a slide layout into its name and slide-level placeholders.
pub(super) fn parse_layout(xml: &str) -> Result<(String, Vec<Region>)> {
    let mut scan = LayoutScan::default();

    let mut reader = quick_xml::Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => scan.open(&e, false),
            Ok(Event::Empty(e)) => scan.open(&e, true),
            Ok(Event::End(e)) if e.local_name().as_ref() == b"sp" => scan.close_shape(),
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::XmlParse(e.to_string())),
            _ => {}
        }
        buf.clear();
    }

    Ok((scan.name, scan.regions))
}

#[cfg(test)]
mod tests {
    use super::*;

    const LAYOUT: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sldLayout xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main" type="twoObj">
  <p:cSld name="Two &amp; More">
    <p:spTree>
      <p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>
      <p:grpSpPr/>
      <p:sp>
        <p:nvSpPr><p:cNvPr id="2" name="Title 1"/><p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr><p:nvPr><p:ph type="title"/></p:nvPr></p:nvSpPr>
        <p:spPr/>
        <p:txBody><a:bodyPr/><a:lstStyle/><a:p/></p:txBody>
      </p:sp>
      <p:sp>
        <p:nvSpPr><p:cNvPr id="3" name="Picture 2"/><p:cNvSpPr/><p:nvPr><p:ph type="pic" idx="1"/></p:nvPr></p:nvSpPr>
        <p:spPr/>
      </p:sp>
      <p:sp>
        <p:nvSpPr><p:cNvPr id="4" name="Content 3"/><p:cNvSpPr/><p:nvPr><p:ph sz="half" idx="2"/></p:nvPr></p:nvSpPr>
        <p:spPr/>
        <p:txBody><a:bodyPr/><a:lstStyle/><a:p/></p:txBody>
      </p:sp>
      <p:sp>
        <p:nvSpPr><p:cNvPr id="5" name="Footer 4"/><p:cNvSpPr/><p:nvPr><p:ph type="ftr" idx="11"/></p:nvPr></p:nvSpPr>
        <p:spPr/>
        <p:txBody><a:bodyPr/><a:lstStyle/><a:p/></p:txBody>
      </p:sp>
      <p:sp>
        <p:nvSpPr><p:cNvPr id="6" name="Decoration"/><p:cNvSpPr/><p:nvPr/></p:nvSpPr>
        <p:spPr/>
      </p:sp>
    </p:spTree>
  </p:cSld>
</p:sldLayout>"#;

    #[test]
    fn test_parse_layout() {
        let (name, regions) = parse_layout(LAYOUT).unwrap();
        assert_eq!(name, "Two & More");
        // footer and the non-placeholder shape are not slide regions
        assert_eq!(regions.len(), 3);

        assert_eq!(regions[0].kind, PlaceholderKind::Title);
        assert_eq!(regions[0].name, "Title 1");
        assert!(regions[0].has_text_frame);

        assert_eq!(regions[1].kind, PlaceholderKind::Picture);
        assert_eq!(regions[1].idx, Some(1));
        assert!(!regions[1].has_text_frame);

        assert_eq!(regions[2].kind, PlaceholderKind::Object);
        assert_eq!(regions[2].idx, Some(2));
    }

    #[test]
    fn test_collect_rel_ids() {
        let xml = r#"<p:sldMaster xmlns:p="p" xmlns:r="r"><p:sldLayoutIdLst>
            <p:sldLayoutId id="2147483649" r:id="rId3"/>
            <p:sldLayoutId id="2147483650" r:id="rId1"/>
        </p:sldLayoutIdLst></p:sldMaster>"#;
        assert_eq!(collect_rel_ids(xml, b"sldLayoutId").unwrap(), vec!["rId3", "rId1"]);
    }

    #[test]
    fn test_missing_presentation() {
        let package = OoxmlContainer::from_parts(Vec::<(String, Vec<u8>)>::new());
        assert!(matches!(discover(&package), Err(Error::MissingComponent(_))));
    }
}
