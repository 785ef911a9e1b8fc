//! Language detection.
//!
//! Detection is best effort: anything the detector cannot classify is treated
//! as the pivot language. Short Latin-script text is easily mistaken for a
//! neighboring Latin-script language, so an unreliable Latin guess counts as
//! a failed detection. Other scripts narrow the candidates enough to keep the
//! guess.

use serde::Serialize;
use whatlang::Script;

/// A detected or pivot language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Language {
    /// ISO 639-1 code where one exists, ISO 639-3 otherwise
    pub code: &'static str,

    /// English name, used when instructing the translation model
    pub name: &'static str,
}

impl Language {
    pub const ENGLISH: Language = Language {
        code: "en",
        name: "English",
    };
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.code)
    }
}

/// Classifies the language of user text.
pub trait LanguageDetector: Send + Sync {
    /// Detect the language of `text`; returns the pivot language on failure.
    fn detect(&self, text: &str) -> Language;

    /// The language retrieval and generation run in.
    fn pivot(&self) -> Language;
}

/// Trigram-based detector backed by `whatlang`.
#[derive(Debug, Clone, Copy)]
pub struct WhatlangDetector {
    pivot: Language,
}

impl WhatlangDetector {
    pub fn new(pivot: Language) -> Self {
        Self { pivot }
    }
}

impl Default for WhatlangDetector {
    fn default() -> Self {
        Self::new(Language::ENGLISH)
    }
}

impl LanguageDetector for WhatlangDetector {
    fn detect(&self, text: &str) -> Language {
        if !text.chars().any(char::is_alphabetic) {
            tracing::debug!("No alphabetic characters, assuming {}", self.pivot.code);
            return self.pivot;
        }

        match whatlang::detect(text) {
            Some(info) if !info.is_reliable() && info.script() == Script::Latin => {
                tracing::debug!(
                    guess = info.lang().code(),
                    confidence = info.confidence(),
                    "Unreliable Latin-script detection, assuming {}",
                    self.pivot.code
                );
                self.pivot
            }
            Some(info) => {
                let lang = info.lang();
                let language = Language {
                    code: iso639_1(lang.code()).unwrap_or(lang.code()),
                    name: lang.eng_name(),
                };
                tracing::debug!(
                    language = language.code,
                    confidence = info.confidence(),
                    reliable = info.is_reliable(),
                    "Detected language"
                );
                language
            }
            None => {
                tracing::debug!("Language detection failed, assuming {}", self.pivot.code);
                self.pivot
            }
        }
    }

    fn pivot(&self) -> Language {
        self.pivot
    }
}

/// Map an ISO 639-3 code to its two-letter ISO 639-1 form.
fn iso639_1(code: &str) -> Option<&'static str> {
    let short = match code {
        "afr" => "af",
        "aka" => "ak",
        "amh" => "am",
        "ara" => "ar",
        "aze" => "az",
        "bel" => "be",
        "ben" => "bn",
        "bul" => "bg",
        "cat" => "ca",
        "ces" => "cs",
        "cmn" => "zh",
        "dan" => "da",
        "deu" => "de",
        "ell" => "el",
        "eng" => "en",
        "epo" => "eo",
        "est" => "et",
        "fin" => "fi",
        "fra" => "fr",
        "guj" => "gu",
        "heb" => "he",
        "hin" => "hi",
        "hrv" => "hr",
        "hun" => "hu",
        "hye" => "hy",
        "ind" => "id",
        "ita" => "it",
        "jav" => "jv",
        "jpn" => "ja",
        "kan" => "kn",
        "kat" => "ka",
        "khm" => "km",
        "kor" => "ko",
        "lat" => "la",
        "lav" => "lv",
        "lit" => "lt",
        "mal" => "ml",
        "mar" => "mr",
        "mkd" => "mk",
        "mya" => "my",
        "nep" => "ne",
        "nld" => "nl",
        "nob" => "nb",
        "ori" => "or",
        "pan" => "pa",
        "pes" => "fa",
        "pol" => "pl",
        "por" => "pt",
        "ron" => "ro",
        "rus" => "ru",
        "sin" => "si",
        "slk" => "sk",
        "slv" => "sl",
        "sna" => "sn",
        "spa" => "es",
        "srp" => "sr",
        "swe" => "sv",
        "tam" => "ta",
        "tel" => "te",
        "tgl" => "tl",
        "tha" => "th",
        "tuk" => "tk",
        "tur" => "tr",
        "ukr" => "uk",
        "urd" => "ur",
        "uzb" => "uz",
        "vie" => "vi",
        "yid" => "yi",
        "zul" => "zu",
        _ => return None,
    };
    Some(short)
}
