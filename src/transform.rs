// Hand-off to the external AI services.
// The services themselves live elsewhere; this module builds what they are
// sent and decides what happens when they come back empty.

use crate::codec;
use crate::error::Error;
use crate::handle::CanvasHandle;
use image::RgbaImage;
use std::fmt;
use std::str::FromStr;
use tracing::{info, warn};

/// Look the generated image should have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnimeStyle {
    Classic,
    #[default]
    Cyberpunk,
    Fantasy,
    Chibi,
    Realistic,
}

impl AnimeStyle {
    pub const ALL: [AnimeStyle; 5] = [
        AnimeStyle::Classic,
        AnimeStyle::Cyberpunk,
        AnimeStyle::Fantasy,
        AnimeStyle::Chibi,
        AnimeStyle::Realistic,
    ];

    pub fn name(self) -> &'static str {
        match self {
            AnimeStyle::Classic => "classic",
            AnimeStyle::Cyberpunk => "cyberpunk",
            AnimeStyle::Fantasy => "fantasy",
            AnimeStyle::Chibi => "chibi",
            AnimeStyle::Realistic => "realistic",
        }
    }

    /// Instruction sent along with the drawing when no custom prompt is given.
    pub fn prompt(self) -> &'static str {
        match self {
            AnimeStyle::Classic => {
                "Identify the main subject of this sketch and redraw it as a clean, \
                 well-proportioned classic anime illustration with expressive eyes."
            }
            AnimeStyle::Cyberpunk => {
                "Identify the main subject of this sketch and redraw it in a gritty \
                 cyberpunk look: neon light, cybernetic details, a dystopian city behind it."
            }
            AnimeStyle::Fantasy => {
                "Identify the main subject of this sketch and place it in a magical \
                 setting with glowing effects, armor or enchanted scenery."
            }
            AnimeStyle::Chibi => {
                "Identify the main subject of this sketch and redraw it super-deformed: \
                 big head, small body, cute features and bright pastel colors."
            }
            AnimeStyle::Realistic => {
                "Identify the main subject of this sketch and render it photorealistically \
                 with natural light, shadows and textures, keeping the composition."
            }
        }
    }
}

impl fmt::Display for AnimeStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AnimeStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AnimeStyle::ALL
            .into_iter()
            .find(|style| style.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                format!(
                    "invalid style '{s}', should be one of 'classic', 'cyberpunk', \
                    'fantasy', 'chibi' or 'realistic'"
                )
            })
    }
}

const CUSTOM_PROMPT_PREFIX: &str = "Treat this drawing as a rough sketch for composition and \
     subject only, ignoring its colors and linework, and create a new high-quality image \
     following the user's prompt: ";

/// What the image service receives.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformRequest {
    /// The drawing as `data:image/png;base64,...`.
    pub drawing_data_url: String,
    pub style: AnimeStyle,
    pub custom_prompt: Option<String>,
}

impl TransformRequest {
    /// Export the canvas into a request. Refuses a canvas that is empty or
    /// cannot be exported, so a blank drawing is never sent.
    pub fn from_canvas(
        canvas: &impl CanvasHandle,
        style: AnimeStyle,
        custom_prompt: Option<String>,
    ) -> Result<Self, Error> {
        if canvas.is_empty() {
            return Err(Error::EmptyCanvas);
        }
        let png = canvas.export_as_image().ok_or(Error::EmptyCanvas)?;
        Ok(Self { drawing_data_url: codec::to_data_url(&png), style, custom_prompt })
    }

    /// The text instruction: the custom prompt when it has content,
    /// otherwise the style's own prompt.
    pub fn prompt(&self) -> String {
        match self.custom_prompt.as_deref().map(str::trim) {
            Some(custom) if !custom.is_empty() => format!("{CUSTOM_PROMPT_PREFIX}\"{custom}\""),
            _ => self.style.prompt().to_string(),
        }
    }
}

/// What the image service answers with.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformResponse {
    pub image_data_url: String,
}

impl TransformResponse {
    /// Decode the returned image so it can be shown or imported.
    pub fn decode(&self) -> Result<RgbaImage, Error> {
        codec::decode_data_url(&self.image_data_url)
    }
}

/// The external drawing-to-image service.
pub trait ImageTransformer {
    fn transform(&self, request: &TransformRequest) -> Result<TransformResponse, Error>;
}

/// The external prompt-rewriting service.
pub trait PromptRefiner {
    fn refine(&self, prompt: &str) -> Result<String, Error>;
}

/// The external service that proposes ready-made prompts to start from.
pub trait PromptSuggester {
    fn suggest(&self) -> Result<Vec<String>, Error>;
}

/// Ask for starter prompts. Blank entries are dropped and the rest trimmed;
/// a failing service just means no suggestions.
pub fn suggest_prompts(suggester: &dyn PromptSuggester) -> Vec<String> {
    match suggester.suggest() {
        Ok(prompts) => prompts
            .iter()
            .map(|p| p.trim())
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect(),
        Err(e) => {
            warn!("prompt suggestions failed: {e}");
            Vec::new()
        }
    }
}

/// Ask for a better prompt; keep the original when the service fails or
/// answers with blank text.
pub fn refine_prompt(refiner: &dyn PromptRefiner, prompt: &str) -> String {
    match refiner.refine(prompt) {
        Ok(refined) if !refined.trim().is_empty() => refined,
        Ok(_) => {
            warn!("prompt refinement came back empty; keeping the original");
            prompt.to_string()
        }
        Err(e) => {
            warn!("prompt refinement failed: {e}");
            prompt.to_string()
        }
    }
}

/// Export, send, decode. Nothing is retried; the caller decides whether to
/// resubmit.
pub fn generate(
    service: &dyn ImageTransformer,
    canvas: &impl CanvasHandle,
    style: AnimeStyle,
    custom_prompt: Option<String>,
) -> Result<RgbaImage, Error> {
    let request = TransformRequest::from_canvas(canvas, style, custom_prompt)?;
    info!(style = %request.style, "sending drawing for transformation");
    let response = service.transform(&request)?;
    response.decode()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::DrawingSurface;
    use crate::types::Point;
    use std::cell::RefCell;

    struct Echo {
        seen: RefCell<Option<TransformRequest>>,
    }

    impl ImageTransformer for Echo {
        fn transform(&self, request: &TransformRequest) -> Result<TransformResponse, Error> {
            *self.seen.borrow_mut() = Some(request.clone());
            Ok(TransformResponse { image_data_url: request.drawing_data_url.clone() })
        }
    }

    struct Fixed(Result<String, ()>);

    impl PromptRefiner for Fixed {
        fn refine(&self, _prompt: &str) -> Result<String, Error> {
            self.0.clone().map_err(|_| Error::Transform("service unavailable".into()))
        }
    }

    struct Canned(Result<Vec<&'static str>, ()>);

    impl PromptSuggester for Canned {
        fn suggest(&self) -> Result<Vec<String>, Error> {
            match &self.0 {
                Ok(list) => Ok(list.iter().map(|p| p.to_string()).collect()),
                Err(()) => Err(Error::Transform("service unavailable".into())),
            }
        }
    }

    fn drawn_surface() -> DrawingSurface {
        let mut s = DrawingSurface::new();
        s.resize(16, 16, 1.0);
        s.begin_stroke(Point::new(2.0, 8.0));
        s.extend_stroke(Point::new(14.0, 8.0));
        s.end_stroke();
        s
    }

    #[test]
    fn empty_canvas_is_refused() {
        let mut s = DrawingSurface::new();
        assert!(matches!(
            TransformRequest::from_canvas(&s, AnimeStyle::Chibi, None),
            Err(Error::EmptyCanvas)
        ));
        s.resize(16, 16, 1.0);
        assert!(matches!(
            TransformRequest::from_canvas(&s, AnimeStyle::Chibi, None),
            Err(Error::EmptyCanvas)
        ));
    }

    #[test]
    fn generate_sends_png_data_url_and_decodes_reply() {
        let s = drawn_surface();
        let svc = Echo { seen: RefCell::new(None) };
        let img = generate(&svc, &s, AnimeStyle::Fantasy, None).unwrap();
        assert_eq!(img.dimensions(), (16, 16));

        let seen = svc.seen.borrow().clone().unwrap();
        assert!(seen.drawing_data_url.starts_with("data:image/png;base64,"));
        assert_eq!(seen.style, AnimeStyle::Fantasy);
    }

    #[test]
    fn custom_prompt_wins_over_style_unless_blank() {
        let s = drawn_surface();
        let with = TransformRequest::from_canvas(&s, AnimeStyle::Classic, Some("a red fox".into()))
            .unwrap();
        assert!(with.prompt().ends_with("\"a red fox\""));

        let blank =
            TransformRequest::from_canvas(&s, AnimeStyle::Classic, Some("   ".into())).unwrap();
        assert_eq!(blank.prompt(), AnimeStyle::Classic.prompt());
    }

    #[test]
    fn refinement_falls_back_to_original() {
        assert_eq!(refine_prompt(&Fixed(Ok("a fox at dusk".into())), "fox"), "a fox at dusk");
        assert_eq!(refine_prompt(&Fixed(Ok("  ".into())), "fox"), "fox");
        assert_eq!(refine_prompt(&Fixed(Err(())), "fox"), "fox");
    }

    #[test]
    fn styles_parse_by_name() {
        assert_eq!("Chibi".parse::<AnimeStyle>().unwrap(), AnimeStyle::Chibi);
        assert!("watercolor".parse::<AnimeStyle>().is_err());
        assert_eq!(AnimeStyle::default(), AnimeStyle::Cyberpunk);
    }

    #[test]
    fn suggestions_skip_blanks_and_survive_failure() {
        let list = Canned(Ok(vec![" neon alley at night ", "", "   ", "chrome samurai"]));
        assert_eq!(suggest_prompts(&list), ["neon alley at night", "chrome samurai"]);
        assert!(suggest_prompts(&Canned(Err(()))).is_empty());
    }
}
