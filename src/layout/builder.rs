//! Deck assembly: cover slide, then paginated section slides.

use super::normalize::{normalize, DeckOutline};
use super::options::DeckOptions;
use super::paginate::{page_title, paginate};
use super::placeholder::{find_title, resolve_body};
use crate::error::{Error, Result};
use crate::model::{BulletLine, DeckRequest, RenderedDeck, Slide, SlideKind};
use crate::template::Template;

/// Builds [`RenderedDeck`]s against one template.
///
/// The template is borrowed read-only, so one builder (or many) can serve
/// any number of requests.
///
/// # Example
///
/// ```
/// use deckgen::layout::{DeckBuilder, DeckOptions};
/// use deckgen::model::DeckRequest;
/// use deckgen::template::Template;
///
/// let template = Template::builtin()?;
/// let builder = DeckBuilder::new(&template, DeckOptions::default())?;
/// let deck = builder.build(DeckRequest::with_bullets("Q1 Report", ["a", "b", "c"]))?;
/// assert_eq!(deck.slide_count(), 2);
/// # Ok::<(), deckgen::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct DeckBuilder<'a> {
    template: &'a Template,
    options: DeckOptions,
}

impl<'a> DeckBuilder<'a> {
    /// Create a builder, rejecting unusable options up front.
    pub fn new(template: &'a Template, options: DeckOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self { template, options })
    }

    /// The options in effect.
    pub fn options(&self) -> &DeckOptions {
        &self.options
    }

    /// The template slides are laid out against.
    pub fn template(&self) -> &'a Template {
        self.template
    }

    /// Normalize a request and build its deck.
    pub fn build(&self, request: DeckRequest) -> Result<RenderedDeck> {
        let outline = normalize(request, &self.options.default_section)?;
        self.build_outline(&outline)
    }

    /// Build a deck from already-normalized content.
    pub fn build_outline(&self, outline: &DeckOutline) -> Result<RenderedDeck> {
        let mut deck = RenderedDeck::new(outline.title.clone());
        deck.add_slide(self.cover_slide(&outline.title)?);

        for (name, bullets) in outline.sections.iter() {
            let pages = paginate(bullets, self.options.max_per_slide)?;
            if pages.is_empty() {
                log::debug!("event=section_skipped section={:?} reason=empty", name);
                continue;
            }
            let total = pages.len();
            for (i, page) in pages.into_iter().enumerate() {
                deck.add_slide(self.content_slide(page_title(name, i, total), page)?);
            }
        }

        log::info!(
            "event=deck_built title={:?} sections={} slides={} bullets={}",
            deck.title,
            outline.sections.len(),
            deck.slide_count(),
            deck.bullet_count()
        );
        Ok(deck)
    }

    fn cover_slide(&self, title: &str) -> Result<Slide> {
        let (index, layout) = self.template.select_layout(&self.options.cover_layout)?;
        let title_region = find_title(&layout.regions);
        if title_region.is_none() {
            log::warn!(
                "event=cover_without_title layout={:?} detail=\"deck title not placed\"",
                layout.name
            );
        }

        Ok(Slide {
            kind: SlideKind::Cover,
            title: title.to_string(),
            layout: index,
            layout_name: layout.name.clone(),
            title_region,
            body_region: None,
            bullets: Vec::new(),
        })
    }

    fn content_slide(&self, title: String, page: &[String]) -> Result<Slide> {
        let (index, layout) = self.template.select_layout(&self.options.content_layout)?;
        let title_region = find_title(&layout.regions).ok_or_else(|| {
            Error::Layout(format!("layout {:?} has no title region", layout.name))
        })?;
        let body_region = resolve_body(&layout.regions, Some(title_region))?;

        let size = self.options.font_scale.size_for(page.len());
        let bullets = page
            .iter()
            .map(|text| BulletLine::new(text.as_str(), size))
            .collect();

        Ok(Slide {
            kind: SlideKind::Content,
            title,
            layout: index,
            layout_name: layout.name.clone(),
            title_region: Some(title_region),
            body_region: Some(body_region),
            bullets,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::FontScale;
    use crate::model::Sections;
    use crate::template::{Layout, PlaceholderKind, Region};

    fn risks(n: usize) -> DeckRequest {
        let bullets = (1..=n).map(|i| format!("r{i}")).collect();
        let sections: Sections = vec![("Risks", bullets)].into_iter().collect();
        DeckRequest::with_sections("X", sections)
    }

    #[test]
    fn test_flat_bullets() {
        let template = Template::builtin().unwrap();
        let builder = DeckBuilder::new(&template, DeckOptions::default()).unwrap();
        let deck = builder
            .build(DeckRequest::with_bullets("Q1 Report", ["a", "b", "c"]))
            .unwrap();

        assert_eq!(deck.slide_count(), 2);
        assert_eq!(deck.slides[0].kind, SlideKind::Cover);
        assert_eq!(deck.slides[0].title, "Q1 Report");
        assert_eq!(deck.slides[0].layout_name, "Title Slide");

        let content = &deck.slides[1];
        assert_eq!(content.title, "General");
        assert_eq!(content.layout_name, "Title and Content");
        assert_eq!(content.bullets.len(), 3);
        assert_eq!(content.body_font_size(), Some(FontScale::BASE));
    }

    #[test]
    fn test_long_section_paginates() {
        let template = Template::builtin().unwrap();
        let builder = DeckBuilder::new(&template, DeckOptions::default()).unwrap();
        let deck = builder.build(risks(7)).unwrap();

        let titles: Vec<&str> = deck.slides.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["X", "Risks (1/2)", "Risks (2/2)"]);
        assert_eq!(deck.slides[1].bullets.len(), 5);
        assert_eq!(deck.slides[1].body_font_size(), Some(FontScale::MEDIUM));
        assert_eq!(deck.slides[2].bullets.len(), 2);
        assert_eq!(deck.slides[2].body_font_size(), Some(FontScale::BASE));
    }

    #[test]
    fn test_large_page_uses_small_font() {
        let template = Template::builtin().unwrap();
        let builder =
            DeckBuilder::new(&template, DeckOptions::new().with_max_per_slide(10)).unwrap();
        let deck = builder.build(risks(7)).unwrap();
        assert_eq!(deck.slide_count(), 2);
        assert_eq!(deck.slides[1].title, "Risks");
        assert_eq!(deck.slides[1].body_font_size(), Some(FontScale::SMALL));
    }

    #[test]
    fn test_empty_section_emits_no_slide() {
        let template = Template::builtin().unwrap();
        let builder = DeckBuilder::new(&template, DeckOptions::default()).unwrap();
        let sections: Sections = vec![("Empty", vec![]), ("Full", vec!["x".to_string()])]
            .into_iter()
            .collect();
        let deck = builder.build(DeckRequest::with_sections("T", sections)).unwrap();
        assert_eq!(deck.slide_count(), 2);
        assert_eq!(deck.slides[1].title, "Full");
    }

    #[test]
    fn test_single_layout_template_without_body_aborts() {
        let template = Template::from_layouts(vec![Layout::new(
            "Title Only",
            "ppt/slideLayouts/slideLayout1.xml",
            vec![Region::new(PlaceholderKind::Title, None)],
        )]);
        let builder = DeckBuilder::new(&template, DeckOptions::default()).unwrap();
        let err = builder.build(DeckRequest::with_bullets("T", ["a"])).unwrap_err();
        assert!(matches!(err, Error::Layout(_)));

        // A cover-only deck still works: no content slide needs a body.
        let deck = builder.build(DeckRequest::with_bullets("T", Vec::<String>::new())).unwrap();
        assert_eq!(deck.slide_count(), 1);
    }

    #[test]
    fn test_cover_without_title_region_continues() {
        let template = Template::from_layouts(vec![
            Layout::new("Blank", "ppt/slideLayouts/slideLayout1.xml", Vec::new()),
            Layout::new(
                "Title and Content",
                "ppt/slideLayouts/slideLayout2.xml",
                vec![
                    Region::new(PlaceholderKind::Title, None),
                    Region::new(PlaceholderKind::Object, Some(1)),
                ],
            ),
        ]);
        let builder = DeckBuilder::new(&template, DeckOptions::default()).unwrap();
        let deck = builder.build(DeckRequest::with_bullets("T", ["a"])).unwrap();
        assert_eq!(deck.slides[0].title_region, None);
        assert_eq!(deck.slides[1].body_region, Some(1));
    }

    #[test]
    fn test_content_layout_without_title_is_error() {
        let template = Template::from_layouts(vec![Layout::new(
            "Body Only",
            "ppt/slideLayouts/slideLayout1.xml",
            vec![Region::new(PlaceholderKind::Body, Some(1))],
        )]);
        let builder = DeckBuilder::new(&template, DeckOptions::default()).unwrap();
        assert!(matches!(
            builder.build(DeckRequest::with_bullets("T", ["a"])),
            Err(Error::Layout(_))
        ));
    }

    #[test]
    fn test_invalid_options_rejected() {
        let template = Template::builtin().unwrap();
        assert!(DeckBuilder::new(&template, DeckOptions::new().with_max_per_slide(0)).is_err());
    }
}
