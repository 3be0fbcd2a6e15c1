use serde::Serialize;
use whatlang::{Lang, detect};

const MIN_CONFIDENCE: f64 = 0.25;
const MIN_TEXT_LENGTH: usize = 50;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetectedLanguage {
    /// ISO 639-1 code where one exists, ISO 639-3 otherwise.
    pub code: String,
    pub confidence: f64,
}

impl DetectedLanguage {
    pub fn is_english(&self) -> bool {
        self.code == "en"
    }
}

/// Guess the corpus language; short or ambiguous text yields `None`.
pub fn detect_language(text: &str) -> Option<DetectedLanguage> {
    if text.trim().len() < MIN_TEXT_LENGTH {
        return None;
    }

    let info = detect(text)?;
    (info.confidence() >= MIN_CONFIDENCE).then(|| DetectedLanguage {
        code: short_code(info.lang()),
        confidence: info.confidence(),
    })
}

fn short_code(lang: Lang) -> String {
    let code = match lang {
        Lang::Eng => "en",
        Lang::Spa => "es",
        Lang::Fra => "fr",
        Lang::Deu => "de",
        Lang::Por => "pt",
        Lang::Ita => "it",
        Lang::Nld => "nl",
        Lang::Rus => "ru",
        Lang::Cmn => "zh",
        Lang::Jpn => "ja",
        Lang::Kor => "ko",
        other => other.code(),
    };
    code.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_english() {
        let text = "Acme Corp is a technology company based in Austin. It builds batteries for electric cars.";
        let detected = detect_language(text).unwrap();
        assert_eq!(detected.code, "en");
        assert!(detected.is_english());
    }

    #[test]
    fn test_detect_spanish() {
        let text = "Esto es una prueba del sistema de detección de idiomas en español. Debería funcionar bien.";
        assert_eq!(detect_language(text).unwrap().code, "es");
    }

    #[test]
    fn test_short_text_returns_none() {
        assert_eq!(detect_language("Acme Corp"), None);
    }

    #[test]
    fn test_symbols_return_none() {
        let text =
            "1 2 3 4 5 6 7 8 9 0 ! @ # $ % ^ & * ( ) - = + [ ] { } | \\ : ; \" ' < > , . ? /";
        assert_eq!(detect_language(text), None);
    }
}
