//! `[Content_Types].xml` handling.

use crate::error::{Error, Result};
use crate::xml::escape_xml;
use quick_xml::events::Event;

pub const SLIDE: &str = "application/vnd.openxmlformats-officedocument.presentationml.slide+xml";
pub const CORE_PROPERTIES: &str = "application/vnd.openxmlformats-package.core-properties+xml";
pub const PRESENTATION_MAIN: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml";

/// Main part types that become a plain presentation once slides are written.
const CONVERTIBLE_MAIN: &[&str] = &[
    "application/vnd.openxmlformats-officedocument.presentationml.template.main+xml",
    "application/vnd.openxmlformats-officedocument.presentationml.slideshow.main+xml",
];

/// Default and override entries of a package's content types part.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentTypes {
    defaults: Vec<(String, String)>,
    overrides: Vec<(String, String)>,
}

impl ContentTypes {
    /// Parse a content types document.
    pub fn parse(xml: &str) -> Result<Self> {
        let mut types = ContentTypes::default();
        let mut reader = quick_xml::Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        loop {
            match reader.read_event() {
                Ok(Event::Empty(e)) | Ok(Event::Start(e)) => {
                    let mut key = None;
                    let mut content_type = None;
                    for attr in e.attributes().flatten() {
                        let value = attr
                            .unescape_value()
                            .map(|v| v.into_owned())
                            .unwrap_or_else(|_| String::from_utf8_lossy(&attr.value).into_owned());
                        match attr.key.as_ref() {
                            b"Extension" | b"PartName" => key = Some(value),
                            b"ContentType" => content_type = Some(value),
                            _ => {}
                        }
                    }
                    let (Some(key), Some(content_type)) = (key, content_type) else {
                        continue;
                    };
                    match e.local_name().as_ref() {
                        b"Default" => types.defaults.push((key.to_ascii_lowercase(), content_type)),
                        b"Override" => types.set_override(&key, content_type),
                        _ => {}
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(Error::XmlParse(e.to_string())),
                _ => {}
            }
        }

        Ok(types)
    }

    /// Register an extension default unless one exists.
    pub fn ensure_default(&mut self, extension: &str, content_type: &str) {
        if !self.defaults.iter().any(|(ext, _)| ext.eq_ignore_ascii_case(extension)) {
            self.defaults.push((extension.to_string(), content_type.to_string()));
        }
    }

    /// Set the override for a part; `part` may be given with or without a leading slash.
    pub fn set_override(&mut self, part: &str, content_type: impl Into<String>) {
        let part_name = format!("/{}", part.trim_start_matches('/'));
        let content_type = content_type.into();
        match self.overrides.iter_mut().find(|(p, _)| p.eq_ignore_ascii_case(&part_name)) {
            Some(entry) => entry.1 = content_type,
            None => self.overrides.push((part_name, content_type)),
        }
    }

    /// Override registered for a part.
    pub fn override_for(&self, part: &str) -> Option<&str> {
        let part_name = format!("/{}", part.trim_start_matches('/'));
        self.overrides
            .iter()
            .find(|(p, _)| p.eq_ignore_ascii_case(&part_name))
            .map(|(_, ct)| ct.as_str())
    }

    /// Drop overrides whose part is not kept.
    pub fn retain_parts(&mut self, mut keep: impl FnMut(&str) -> bool) {
        self.overrides.retain(|(p, _)| keep(p.trim_start_matches('/')));
    }

    /// Turn a template or slideshow main part into a presentation.
    ///
    /// Returns whether anything changed.
    pub fn convert_main_part(&mut self, presentation_part: &str) -> bool {
        match self.override_for(presentation_part) {
            Some(ct) if CONVERTIBLE_MAIN.contains(&ct) => {
                self.set_override(presentation_part, PRESENTATION_MAIN);
                true
            }
            Some(_) => false,
            None => {
                self.set_override(presentation_part, PRESENTATION_MAIN);
                true
            }
        }
    }

    /// Serialize to a content types document.
    pub fn to_xml(&self) -> String {
        let mut xml = String::with_capacity(256 + self.overrides.len() * 160);
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push_str(r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#);
        for (ext, ct) in &self.defaults {
            xml.push_str(&format!(
                r#"<Default Extension="{}" ContentType="{}"/>"#,
                escape_xml(ext),
                escape_xml(ct)
            ));
        }
        for (part, ct) in &self.overrides {
            xml.push_str(&format!(
                r#"<Override PartName="{}" ContentType="{}"/>"#,
                escape_xml(part),
                escape_xml(ct)
            ));
        }
        xml.push_str("</Types>");
        xml
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEMPLATE_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="PNG" ContentType="image/png"/>
  <Default Extension="xml" ContentType="application/xml"/>
  <Override PartName="/ppt/presentation.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.template.main+xml"/>
  <Override PartName="/ppt/slides/slide1.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slide+xml"/>
  <Override PartName="/ppt/theme/theme1.xml" ContentType="application/vnd.openxmlformats-officedocument.theme+xml"/>
</Types>"#;

    #[test]
    fn test_parse_and_convert_template() {
        let mut types = ContentTypes::parse(TEMPLATE_TYPES).unwrap();
        assert!(types.convert_main_part("ppt/presentation.xml"));
        assert_eq!(types.override_for("/ppt/presentation.xml"), Some(PRESENTATION_MAIN));
        // already a presentation: nothing to do
        assert!(!types.convert_main_part("ppt/presentation.xml"));
    }

    #[test]
    fn test_retain_and_add() {
        let mut types = ContentTypes::parse(TEMPLATE_TYPES).unwrap();
        types.retain_parts(|p| !p.starts_with("ppt/slides/"));
        assert_eq!(types.override_for("ppt/slides/slide1.xml"), None);

        types.set_override("ppt/slides/slide2.xml", SLIDE);
        types.ensure_default("png", "image/png");
        types.ensure_default("rels", "application/vnd.openxmlformats-package.relationships+xml");

        let xml = types.to_xml();
        assert!(xml.contains(r#"<Override PartName="/ppt/slides/slide2.xml""#));
        assert!(xml.contains(r#"<Default Extension="rels""#));
        assert_eq!(xml.matches("Extension=\"png\"").count(), 1);
    }
}
