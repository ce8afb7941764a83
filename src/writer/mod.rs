//! Serializing a [`RenderedDeck`] into a `.pptx` package.
//!
//! The template package is copied part by part. Slides the template already
//! had are left out, and the parts that list slides are regenerated:
//! `presentation.xml`, its relationships, `[Content_Types].xml` and the core
//! properties.
//!
//! # Example
//!
//! ```
//! use deckgen::layout::{DeckBuilder, DeckOptions};
//! use deckgen::model::DeckRequest;
//! use deckgen::template::Template;
//! use deckgen::writer::PackageWriter;
//!
//! let template = Template::builtin()?;
//! let deck = DeckBuilder::new(&template, DeckOptions::default())?
//!     .build(DeckRequest::with_bullets("Demo", ["one", "two"]))?;
//! let bytes = PackageWriter::new(&template).to_bytes(&deck)?;
//! assert!(bytes.starts_with(b"PK"));
//! # Ok::<(), deckgen::Error>(())
//! ```

mod content_types;
mod presentation;
mod slide;

pub use content_types::ContentTypes;
pub use presentation::{rewrite_presentation, FIRST_SLIDE_ID};
pub use slide::slide_xml;

use crate::container::{rel_types, OoxmlContainer, Relationship, Relationships};
use crate::error::{Error, Result};
use crate::model::RenderedDeck;
use crate::template::Template;
use crate::xml::{escape_xml, sanitize_text};
use std::io::{Cursor, Seek, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

const CORE_PART: &str = "docProps/core.xml";
const CONTENT_TYPES_PART: &str = "[Content_Types].xml";
const PACKAGE_RELS_PART: &str = "_rels/.rels";

/// Folders whose parts belong to template slides.
const SLIDE_FOLDERS: &[&str] = &["ppt/slides/", "ppt/notesSlides/", "ppt/comments/"];

/// Writes decks as packages derived from one template.
#[derive(Debug, Clone, Copy)]
pub struct PackageWriter<'a> {
    template: &'a Template,
}

impl<'a> PackageWriter<'a> {
    /// Create a writer for `template`.
    pub fn new(template: &'a Template) -> Self {
        Self { template }
    }

    /// Serialize `deck` into an in-memory `.pptx`.
    pub fn to_bytes(&self, deck: &RenderedDeck) -> Result<Vec<u8>> {
        Ok(self.write(deck, Cursor::new(Vec::new()))?.into_inner())
    }

    /// Serialize `deck` into `out`, returning the writer once the archive is finished.
    pub fn write<W: Write + Seek>(&self, deck: &RenderedDeck, out: W) -> Result<W> {
        let (parts, stale) = self.generate(deck)?;
        let package = self.template.package();

        let mut zip = ZipWriter::new(out);
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        for (name, data) in &parts {
            add_entry(&mut zip, name, data, options)?;
        }
        let mut copied = 0usize;
        for (name, data) in package.parts() {
            if parts.iter().any(|(n, _)| n == name)
                || stale.iter().any(|s| s == name)
                || self.is_regenerated(name)
            {
                continue;
            }
            add_entry(&mut zip, name, data, options)?;
            copied += 1;
        }

        let out = zip
            .finish()
            .map_err(|e| Error::Serialization(format!("finishing archive: {e}")))?;
        log::debug!(
            "event=package_written slides={} generated_parts={} copied_parts={}",
            deck.slide_count(),
            parts.len(),
            copied
        );
        Ok(out)
    }

    /// Parts of the template that the writer replaces or drops.
    fn is_regenerated(&self, name: &str) -> bool {
        let presentation = self.template.presentation_part();
        name == CONTENT_TYPES_PART
            || name == PACKAGE_RELS_PART
            || name == CORE_PART
            || name == presentation
            || name == OoxmlContainer::rels_path_for(presentation)
            || SLIDE_FOLDERS.iter().any(|f| name.starts_with(f))
    }

    /// Generate every part that differs from the template, in archive order,
    /// plus template parts that must not be copied.
    fn generate(&self, deck: &RenderedDeck) -> Result<(Vec<(String, Vec<u8>)>, Vec<String>)> {
        let package = self.template.package();
        let presentation_part = self.template.presentation_part();
        let slide_folder = OoxmlContainer::resolve_path(presentation_part, "slides");

        let mut presentation_rels = package.read_relationships(presentation_part)?;
        presentation_rels.remove_type(rel_types::SLIDE);

        let mut package_rels = package.read_package_relationships()?;
        let old_core: Vec<String> = package_rels
            .get_by_type(rel_types::CORE_PROPERTIES)
            .into_iter()
            .map(|r| OoxmlContainer::resolve_path("", &r.target))
            .collect();
        package_rels.remove_type(rel_types::CORE_PROPERTIES);
        package_rels.add(Relationship::internal(
            package_rels.next_id(),
            rel_types::CORE_PROPERTIES,
            CORE_PART,
        ));

        let mut slides = Vec::with_capacity(deck.slide_count());
        let mut slide_rel_ids = Vec::with_capacity(deck.slide_count());
        for (i, slide) in deck.slides.iter().enumerate() {
            let layout = self.template.layout(slide.layout).ok_or_else(|| {
                Error::Layout(format!("slide {} refers to missing layout {}", i + 1, slide.layout))
            })?;
            let part_name = format!("{}/slide{}.xml", slide_folder, i + 1);

            let mut rels = Relationships::new();
            rels.add(Relationship::internal(
                "rId1",
                rel_types::SLIDE_LAYOUT,
                OoxmlContainer::relative_target(&part_name, &layout.part_name),
            ));

            let rel_id = presentation_rels.next_id();
            presentation_rels.add(Relationship::internal(
                rel_id.clone(),
                rel_types::SLIDE,
                OoxmlContainer::relative_target(presentation_part, &part_name),
            ));
            slide_rel_ids.push(rel_id);

            slides.push((part_name.clone(), slide_xml(slide, layout)?.into_bytes()));
            slides.push((
                OoxmlContainer::rels_path_for(&part_name),
                rels.to_xml().into_bytes(),
            ));
        }

        let presentation_xml = package.read_xml(presentation_part)?;
        let presentation_xml = rewrite_presentation(&presentation_xml, &slide_rel_ids)?;

        let mut types = ContentTypes::parse(&package.read_xml(CONTENT_TYPES_PART)?)?;
        types.retain_parts(|p| {
            package.exists(p)
                && !SLIDE_FOLDERS.iter().any(|f| p.starts_with(f))
                && !old_core.iter().any(|c| c == p)
        });
        if types.convert_main_part(presentation_part) {
            log::debug!("event=main_part_converted part={}", presentation_part);
        }
        types.ensure_default("rels", "application/vnd.openxmlformats-package.relationships+xml");
        types.ensure_default("xml", "application/xml");
        types.set_override(CORE_PART, content_types::CORE_PROPERTIES);
        for (name, _) in slides.iter().filter(|(n, _)| n.ends_with(".xml")) {
            types.set_override(name, content_types::SLIDE);
        }

        let mut parts = Vec::with_capacity(slides.len() + 5);
        parts.push((CONTENT_TYPES_PART.to_string(), types.to_xml().into_bytes()));
        parts.push((PACKAGE_RELS_PART.to_string(), package_rels.to_xml().into_bytes()));
        parts.push((CORE_PART.to_string(), core_properties(&deck.title).into_bytes()));
        parts.push((presentation_part.to_string(), presentation_xml.into_bytes()));
        parts.push((
            OoxmlContainer::rels_path_for(presentation_part),
            presentation_rels.to_xml().into_bytes(),
        ));
        parts.extend(slides);

        Ok((parts, old_core))
    }
}

fn add_entry<W: Write + Seek>(
    zip: &mut ZipWriter<W>,
    name: &str,
    data: &[u8],
    options: SimpleFileOptions,
) -> Result<()> {
    zip.start_file(name, options)
        .map_err(|e| Error::Serialization(format!("{name}: {e}")))?;
    zip.write_all(data)
        .map_err(|e| Error::Serialization(format!("{name}: {e}")))
}

/// Core properties naming the deck.
fn core_properties(title: &str) -> String {
    format!(
        concat!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
            r#"<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" "#,
            r#"xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" "#,
            r#"xmlns:dcmitype="http://purl.org/dc/dcmitype/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">"#,
            "<dc:title>{}</dc:title><dc:creator>deckgen</dc:creator><cp:revision>1</cp:revision>",
            "</cp:coreProperties>"
        ),
        escape_xml(&sanitize_text(title))
    )
}
