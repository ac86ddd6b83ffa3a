use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::payload::{ImagePayload, has_image};
use crate::foundation::color::Color;
use crate::foundation::error::{PromoError, PromoResult};

/// Page configuration: page-level settings plus an ordered module list.
///
/// The engine only reads a configuration; it is never mutated during a build.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Configuration {
    /// Page-level settings.
    #[serde(default)]
    pub page: PageSettings,
    /// Modules in declaration order.
    #[serde(default)]
    pub modules: Vec<Module>,
}

/// Page-level settings.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PageSettings {
    /// Page width in pixels; engine default when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    /// Full-page background image.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<ImagePayload>,
    /// Solid page background color.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<Color>,
}

/// A self-contained visual section of the page.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(try_from = "ModuleRepr", into = "ModuleRepr")]
pub struct Module {
    /// Module identifier, unique within a configuration.
    pub id: String,
    /// Human-facing title (not rendered).
    pub title: String,
    /// Kind-specific payload.
    pub content: ModuleContent,
}

/// Discriminated module kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ModuleKind {
    /// Hero/title header.
    Header,
    /// Game name, description, icon and download button.
    GameInfo,
    /// Custom heading + body + image block.
    Activity,
    /// Custom 3×3 prize grid.
    NineGrid,
    /// Custom single image.
    ImageBlock,
    /// Rules text.
    Rules,
    /// Page footer.
    Footer,
}

/// Composition order bucket for a module kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum ModuleFamily {
    /// Header modules come first.
    Header,
    /// Then game info.
    GameInfo,
    /// Then custom modules, in configuration order.
    Custom,
    /// Then rules.
    Rules,
    /// Footer last.
    Footer,
}

impl ModuleKind {
    /// Stable key used for node names and channel rule tables.
    pub fn key(self) -> &'static str {
        match self {
            Self::Header => "header",
            Self::GameInfo => "gameInfo",
            Self::Activity => "activity",
            Self::NineGrid => "nineGrid",
            Self::ImageBlock => "imageBlock",
            Self::Rules => "rules",
            Self::Footer => "footer",
        }
    }

    /// Composition order bucket.
    pub fn family(self) -> ModuleFamily {
        match self {
            Self::Header => ModuleFamily::Header,
            Self::GameInfo => ModuleFamily::GameInfo,
            Self::Activity | Self::NineGrid | Self::ImageBlock => ModuleFamily::Custom,
            Self::Rules => ModuleFamily::Rules,
            Self::Footer => ModuleFamily::Footer,
        }
    }
}

/// Kind-specific module payloads.
#[derive(Clone, Debug, PartialEq)]
pub enum ModuleContent {
    /// Header payload.
    Header(HeaderContent),
    /// Game info payload.
    GameInfo(GameInfoContent),
    /// Activity payload.
    Activity(ActivityContent),
    /// Nine-grid payload.
    NineGrid(NineGridContent),
    /// Image block payload.
    ImageBlock(ImageBlockContent),
    /// Rules payload.
    Rules(RulesContent),
    /// Footer payload.
    Footer(FooterContent),
}

impl ModuleContent {
    /// Discriminant of this payload.
    pub fn kind(&self) -> ModuleKind {
        match self {
            Self::Header(_) => ModuleKind::Header,
            Self::GameInfo(_) => ModuleKind::GameInfo,
            Self::Activity(_) => ModuleKind::Activity,
            Self::NineGrid(_) => ModuleKind::NineGrid,
            Self::ImageBlock(_) => ModuleKind::ImageBlock,
            Self::Rules(_) => ModuleKind::Rules,
            Self::Footer(_) => ModuleKind::Footer,
        }
    }

    /// Whether the builder for this payload would produce a node.
    pub fn has_content(&self) -> bool {
        match self {
            Self::Header(c) => c.has_content(),
            Self::GameInfo(c) => c.has_content(),
            Self::Activity(c) => c.has_content(),
            Self::NineGrid(c) => c.has_content(),
            Self::ImageBlock(c) => c.has_content(),
            Self::Rules(c) => c.has_content(),
            Self::Footer(c) => c.has_content(),
        }
    }
}

fn has_text(s: &Option<String>) -> bool {
    s.as_deref().is_some_and(|t| !t.trim().is_empty())
}

/// Header: hero image, title image and optional subtitle.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HeaderContent {
    /// Full-width hero image.
    pub hero_image: Option<ImagePayload>,
    /// Title artwork drawn over the hero.
    pub title_image: Option<ImagePayload>,
    /// Subtitle text below the title.
    pub subtitle: Option<String>,
}

impl HeaderContent {
    /// A header needs a hero image or a title image; a subtitle alone is not enough.
    pub fn has_content(&self) -> bool {
        has_image(&self.hero_image) || has_image(&self.title_image)
    }
}

/// Button placement inside the game info module.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ButtonLayout {
    /// Full-width button below the text block.
    #[default]
    Stacked,
    /// Compact button to the right of the text block.
    Inline,
}

/// Game info: icon, name, description and download button.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GameInfoContent {
    /// Game name.
    pub game_name: Option<String>,
    /// One-paragraph description.
    pub game_desc: Option<String>,
    /// Square app icon.
    pub game_icon: Option<ImagePayload>,
    /// Button variant; drives the module height.
    pub button_layout: ButtonLayout,
    /// Button artwork; the button is omitted without it.
    pub button_background: Option<ImagePayload>,
    /// Label drawn on the button.
    pub button_text: Option<String>,
    /// Module background fill.
    pub background_color: Option<Color>,
}

impl GameInfoContent {
    /// True when any visible element would be produced.
    pub fn has_content(&self) -> bool {
        has_text(&self.game_name)
            || has_text(&self.game_desc)
            || has_image(&self.game_icon)
            || has_image(&self.button_background)
    }
}

/// Custom activity block: heading, body text and an image.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ActivityContent {
    /// Heading text.
    pub heading: Option<String>,
    /// Body text, wrapped to the module width.
    pub body: Option<String>,
    /// Illustration below the text.
    pub image: Option<ImagePayload>,
    /// Module background fill.
    pub background_color: Option<Color>,
}

impl ActivityContent {
    /// True when any visible element would be produced.
    pub fn has_content(&self) -> bool {
        has_text(&self.heading) || has_text(&self.body) || has_image(&self.image)
    }
}

/// One prize on the nine-grid board.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Prize {
    /// Prize label.
    pub name: Option<String>,
    /// Prize artwork.
    pub image: Option<ImagePayload>,
}

impl Prize {
    /// True when the prize has a label or artwork.
    pub fn has_content(&self) -> bool {
        has_text(&self.name) || has_image(&self.image)
    }
}

/// Custom 3×3 lottery grid with eight prize cells around a center action cell.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NineGridContent {
    /// Prizes in perimeter order; at most eight are used.
    pub prizes: Vec<Prize>,
    /// Center action button artwork.
    pub action_image: Option<ImagePayload>,
    /// Center action label, used when there is no artwork.
    pub action_text: Option<String>,
    /// Board background artwork.
    pub background: Option<ImagePayload>,
}

impl NineGridContent {
    /// A board needs at least one non-empty prize or an action image.
    pub fn has_content(&self) -> bool {
        self.prizes.iter().any(Prize::has_content) || has_image(&self.action_image)
    }
}

/// Custom single-image block.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ImageBlockContent {
    /// The image.
    pub image: Option<ImagePayload>,
}

impl ImageBlockContent {
    /// True when the image is present.
    pub fn has_content(&self) -> bool {
        has_image(&self.image)
    }
}

/// Rules: heading plus a list of rule lines.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RulesContent {
    /// Heading text.
    pub heading: Option<String>,
    /// Rule lines in display order.
    pub lines: Vec<String>,
    /// Module background fill.
    pub background_color: Option<Color>,
}

impl RulesContent {
    /// True when the heading or any non-blank line is present.
    pub fn has_content(&self) -> bool {
        has_text(&self.heading) || self.lines.iter().any(|l| !l.trim().is_empty())
    }
}

/// Footer: logo and fine print.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FooterContent {
    /// Publisher logo.
    pub logo: Option<ImagePayload>,
    /// Fine-print text.
    pub text: Option<String>,
}

impl FooterContent {
    /// True when the logo or text is present.
    pub fn has_content(&self) -> bool {
        has_image(&self.logo) || has_text(&self.text)
    }
}

impl Module {
    /// Discriminant of this module.
    pub fn kind(&self) -> ModuleKind {
        self.content.kind()
    }
}

#[derive(Serialize, Deserialize)]
struct ModuleRepr {
    id: String,
    #[serde(default)]
    title: String,
    #[serde(rename = "type")]
    kind: ModuleKind,
    #[serde(default)]
    content: serde_json::Value,
}

impl TryFrom<ModuleRepr> for Module {
    type Error = String;

    fn try_from(repr: ModuleRepr) -> Result<Self, Self::Error> {
        fn payload<T: serde::de::DeserializeOwned + Default>(
            id: &str,
            v: serde_json::Value,
        ) -> Result<T, String> {
            if v.is_null() {
                return Ok(T::default());
            }
            serde_json::from_value(v).map_err(|e| format!("module '{id}': {e}"))
        }

        let id = repr.id;
        let content = match repr.kind {
            ModuleKind::Header => ModuleContent::Header(payload(&id, repr.content)?),
            ModuleKind::GameInfo => ModuleContent::GameInfo(payload(&id, repr.content)?),
            ModuleKind::Activity => ModuleContent::Activity(payload(&id, repr.content)?),
            ModuleKind::NineGrid => ModuleContent::NineGrid(payload(&id, repr.content)?),
            ModuleKind::ImageBlock => ModuleContent::ImageBlock(payload(&id, repr.content)?),
            ModuleKind::Rules => ModuleContent::Rules(payload(&id, repr.content)?),
            ModuleKind::Footer => ModuleContent::Footer(payload(&id, repr.content)?),
        };
        Ok(Self {
            id,
            title: repr.title,
            content,
        })
    }
}

impl From<Module> for ModuleRepr {
    fn from(m: Module) -> Self {
        let kind = m.kind();
        let content = match &m.content {
            ModuleContent::Header(c) => serde_json::to_value(c),
            ModuleContent::GameInfo(c) => serde_json::to_value(c),
            ModuleContent::Activity(c) => serde_json::to_value(c),
            ModuleContent::NineGrid(c) => serde_json::to_value(c),
            ModuleContent::ImageBlock(c) => serde_json::to_value(c),
            ModuleContent::Rules(c) => serde_json::to_value(c),
            ModuleContent::Footer(c) => serde_json::to_value(c),
        }
        .unwrap_or(serde_json::Value::Null);
        Self {
            id: m.id,
            title: m.title,
            kind,
            content,
        }
    }
}

impl Configuration {
    /// Parse a configuration from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> PromoResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| PromoError::serde(format!("parse configuration JSON: {e}")))
    }

    /// Parse a configuration from a JSON string.
    pub fn from_json_str(s: &str) -> PromoResult<Self> {
        serde_json::from_str(s)
            .map_err(|e| PromoError::serde(format!("parse configuration JSON: {e}")))
    }

    /// Parse a configuration from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> PromoResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            PromoError::validation(format!("open configuration '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Presence checks only: page width must be positive, module ids non-empty.
    pub fn validate(&self) -> PromoResult<()> {
        if let Some(w) = self.page.width
            && (!w.is_finite() || w <= 0.0)
        {
            return Err(PromoError::validation("page width must be finite and > 0"));
        }
        if let Some(m) = self.modules.iter().find(|m| m.id.trim().is_empty()) {
            return Err(PromoError::validation(format!(
                "module of type '{}' has an empty id",
                m.kind().key()
            )));
        }
        Ok(())
    }

    /// Whether any module would produce a node.
    pub fn has_any_content(&self) -> bool {
        self.modules.iter().any(|m| m.content.has_content())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/model.rs"]
mod tests;
