//! Stream rewrite of the main presentation part.

use crate::error::{Error, Result};
use crate::xml::{local_name, prefix_of};
use quick_xml::events::{BytesEnd, BytesStart, Event};
use quick_xml::{Reader, Writer};

const REL_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

/// `p:ext` carrying the section list, which names slide ids.
const SECTION_LIST_EXT: &str = "{521415D9-36F7-43E2-AB2F-B90AF26B5E84}";

/// First slide id PowerPoint hands out.
pub const FIRST_SLIDE_ID: u32 = 256;

/// Children of `p:presentation` that follow `p:sldIdLst` in schema order.
const AFTER_SLIDE_LIST: &[&[u8]] = &[
    b"sldSz",
    b"notesSz",
    b"smartTags",
    b"embeddedFontLst",
    b"custShowLst",
    b"photoAlbum",
    b"custDataLst",
    b"kinsoku",
    b"defaultTextStyle",
    b"modifyVerifier",
    b"extLst",
];

/// Children dropped because they reference the template's own slides.
const SLIDE_REFERENCING: &[&[u8]] = &[b"sldIdLst", b"custShowLst"];

struct SlideList<'a> {
    p: String,
    r: String,
    declare_r: bool,
    rel_ids: &'a [String],
}

impl SlideList<'_> {
    fn write(&self, writer: &mut Writer<Vec<u8>>) -> Result<()> {
        if self.rel_ids.is_empty() {
            return Ok(());
        }
        let list_name = format!("{}sldIdLst", self.p);
        let mut list = BytesStart::new(list_name.as_str());
        if self.declare_r {
            list.push_attribute(("xmlns:r", REL_NS));
        }
        emit(writer, Event::Start(list))?;

        let item_name = format!("{}sldId", self.p);
        let rid_attr = format!("{}id", self.r);
        for (i, rel_id) in self.rel_ids.iter().enumerate() {
            let id = (FIRST_SLIDE_ID + i as u32).to_string();
            let mut item = BytesStart::new(item_name.as_str());
            item.push_attribute(("id", id.as_str()));
            item.push_attribute((rid_attr.as_str(), rel_id.as_str()));
            emit(writer, Event::Empty(item))?;
        }

        emit(writer, Event::End(BytesEnd::new(list_name.as_str())))
    }
}

fn emit(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<()> {
    writer
        .write_event(event)
        .map_err(|e| Error::Serialization(format!("presentation.xml: {e}")))
}

/// Prefix bound to the relationships namespace on the root element.
fn relationship_prefix(root: &BytesStart<'_>) -> Option<String> {
    root.attributes().flatten().find_map(|a| {
        let key = a.key.as_ref();
        let prefix = key.strip_prefix(b"xmlns:")?;
        (a.value.as_ref() == REL_NS.as_bytes())
            .then(|| format!("{}:", String::from_utf8_lossy(prefix)))
    })
}

fn attr_is(e: &BytesStart<'_>, key: &[u8], value: &str) -> bool {
    e.attributes()
        .flatten()
        .any(|a| a.key.as_ref() == key && a.value.as_ref() == value.as_bytes())
}

/// Replace the slide id list of `xml` with one entry per relationship id.
///
/// Ids are numbered from [`FIRST_SLIDE_ID`] in order. Custom shows and the
/// section list are dropped; everything else passes through unchanged.
pub fn rewrite_presentation(xml: &str, slide_rel_ids: &[String]) -> Result<String> {
    let mut reader = Reader::from_str(xml);
    let mut writer = Writer::new(Vec::with_capacity(xml.len() + slide_rel_ids.len() * 48));

    let mut depth = 0usize;
    let mut skip_from: Option<usize> = None;
    let mut in_ext_lst = false;
    let mut inserted = false;
    let mut list: Option<SlideList<'_>> = None;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| Error::XmlParse(format!("presentation.xml: {e}")))?;

        match event {
            Event::Eof => break,
            Event::Start(e) => {
                depth += 1;
                if skip_from.is_some() {
                    continue;
                }
                let name = e.local_name();
                match depth {
                    1 => {
                        let qname = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                        let r = relationship_prefix(&e);
                        list = Some(SlideList {
                            p: prefix_of(&qname).to_string(),
                            declare_r: r.is_none(),
                            r: r.unwrap_or_else(|| "r:".to_string()),
                            rel_ids: slide_rel_ids,
                        });
                    }
                    2 => {
                        if SLIDE_REFERENCING.contains(&name.as_ref()) {
                            skip_from = Some(depth);
                            continue;
                        }
                        if !inserted && AFTER_SLIDE_LIST.contains(&name.as_ref()) {
                            if let Some(list) = &list {
                                list.write(&mut writer)?;
                            }
                            inserted = true;
                        }
                        in_ext_lst = name.as_ref() == b"extLst";
                    }
                    3 if in_ext_lst
                        && name.as_ref() == b"ext"
                        && attr_is(&e, b"uri", SECTION_LIST_EXT) =>
                    {
                        skip_from = Some(depth);
                        continue;
                    }
                    _ => {}
                }
                emit(&mut writer, Event::Start(e))?;
            }
            Event::Empty(e) => {
                if skip_from.is_some() {
                    continue;
                }
                if depth == 1 {
                    let name = e.local_name();
                    if SLIDE_REFERENCING.contains(&name.as_ref()) {
                        continue;
                    }
                    if !inserted && AFTER_SLIDE_LIST.contains(&name.as_ref()) {
                        if let Some(list) = &list {
                            list.write(&mut writer)?;
                        }
                        inserted = true;
                    }
                }
                emit(&mut writer, Event::Empty(e))?;
            }
            Event::End(e) => {
                let closing = depth;
                depth = depth.saturating_sub(1);
                match skip_from {
                    Some(start) if start == closing => {
                        skip_from = None;
                        continue;
                    }
                    Some(_) => continue,
                    None => {}
                }
                if closing == 2 && local_name(e.name().as_ref()) == b"extLst" {
                    in_ext_lst = false;
                }
                if closing == 1 && !inserted {
                    if let Some(list) = &list {
                        list.write(&mut writer)?;
                    }
                    inserted = true;
                }
                emit(&mut writer, Event::End(e))?;
            }
            other => {
                if skip_from.is_none() {
                    emit(&mut writer, other)?;
                }
            }
        }
    }

    String::from_utf8(writer.into_inner())
        .map_err(|e| Error::Serialization(format!("presentation.xml is not UTF-8: {e}")))
}
