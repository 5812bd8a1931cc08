//! Transcript boundary - validated speech results and phrase translation
//!
//! Speech capture is an external collaborator; everything it hands us is
//! narrowed into `Transcription` here before it can reach the pipeline.
//! Also carries the fixed phrase-translation table so non-English command
//! phrasings arrive at the classifier as English text.

use serde::{Deserialize, Serialize};

use crate::error::VoiceDevError;

/// Confidence reported for a phrase found in the translation table.
pub const TRANSLATION_HIT_CONFIDENCE: f32 = 0.95;
/// Confidence reported for untranslated passthrough.
pub const TRANSLATION_MISS_CONFIDENCE: f32 = 0.70;

/// A finalized speech recognition result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcription {
    pub text: String,
    /// Recognizer confidence in [0, 1].
    pub confidence: f32,
    pub is_final: bool,
}

impl Transcription {
    /// Validate a raw speech event into a transcription the pipeline will
    /// accept. Non-final and empty results are rejected here, not deeper in.
    pub fn new(text: impl Into<String>, confidence: f32, is_final: bool) -> Result<Self, VoiceDevError> {
        let text = text.into();
        if !is_final {
            return Err(VoiceDevError::InvalidTranscript("not finalized"));
        }
        if text.trim().is_empty() {
            return Err(VoiceDevError::InvalidTranscript("empty text"));
        }
        if !(0.0..=1.0).contains(&confidence) || confidence.is_nan() {
            return Err(VoiceDevError::InvalidTranscript("confidence out of range"));
        }
        Ok(Self { text, confidence, is_final })
    }
}

/// Result of running a transcript through the translation table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslatedCommand {
    pub original_text: String,
    pub translated_text: String,
    pub detected_language: String,
    pub confidence: f32,
}

/// Detect the spoken language of a transcript. Script ranges first, then
/// keyword probes and accent classes for Latin-script languages, default
/// English. Spanish accents are checked before French.
pub fn detect_spoken_language(text: &str) -> &'static str {
    if text.chars().any(|c| ('\u{0900}'..='\u{097F}').contains(&c)) {
        return "hi";
    }
    if text.chars().any(|c| ('\u{0590}'..='\u{05FF}').contains(&c)) {
        return "he";
    }
    if text.chars().any(|c| ('\u{0600}'..='\u{06FF}').contains(&c)) {
        // Urdu and Arabic share the block; Urdu-specific letters decide.
        if text.chars().any(|c| matches!(c, '\u{0679}' | '\u{0688}' | '\u{0691}' | '\u{06BA}' | '\u{06BE}' | '\u{06C1}' | '\u{06D2}')) {
            return "ur";
        }
        return "ar";
    }
    let lower = text.to_lowercase();
    if ["hola", "gracias", "por favor"].iter().any(|w| lower.contains(w)) {
        return "es";
    }
    if ["bonjour", "merci", "s'il vous plaît"].iter().any(|w| lower.contains(w)) {
        return "fr";
    }
    if lower.chars().any(|c| "ñáéíóúü".contains(c)) {
        return "es";
    }
    if lower.chars().any(|c| "àâäéèêëïîôöùûüÿç".contains(c)) {
        return "fr";
    }
    "en"
}

// Known non-English command phrasings mapped to their English equivalents.
// Closed table; anything else passes through untranslated.
const PHRASE_TABLE: &[(&str, &str)] = &[
    // Urdu
    ("ایک فنکشن بناؤ جو دو نمبروں کا مجموعہ نکالے", "Create a function that adds two numbers"),
    ("پائتھن میں لکھو", "write in Python"),
    ("جاوا میں لکھو", "write in Java"),
    ("جاوا اسکرپٹ میں لکھو", "write in JavaScript"),
    ("نئی فائل بناؤ", "create new file"),
    ("ڈیبگ کرو", "debug this"),
    ("ویری ایبل بناؤ", "create a variable"),
    ("لوپ بناؤ", "create a loop"),
    ("کنڈیشن لگاؤ", "add a condition"),
    ("کلاس بناؤ", "create a class"),
    ("فار لوپ", "for loop"),
    ("وائل لوپ", "while loop"),
    // Hindi
    ("एक फंक्शन बनाओ जो दो संख्याओं को जोड़े", "Create a function that adds two numbers"),
    ("पायथन में लिखो", "write in Python"),
    ("जावा में लिखो", "write in Java"),
    ("जावास्क्रिप्ट में लिखो", "write in JavaScript"),
    ("नई फाइल बनाओ", "create new file"),
    ("डिबग करो", "debug this"),
    ("वेरिएबल बनाओ", "create a variable"),
    ("लूप बनाओ", "create a loop"),
    ("क्लास बनाओ", "create a class"),
    // Arabic
    ("إنشاء دالة تجمع رقمين", "Create a function that adds two numbers"),
    ("اكتب في بايثون", "write in Python"),
    ("اكتب في جافا", "write in Java"),
    ("إنشاء ملف جديد", "create new file"),
    ("تصحيح هذا", "debug this"),
    ("إنشاء متغير", "create a variable"),
    ("إنشاء حلقة", "create a loop"),
    // Spanish
    ("crear una función que sume dos números", "Create a function that adds two numbers"),
    ("escribir en python", "write in Python"),
    ("escribir en java", "write in Java"),
    ("crear nuevo archivo", "create new file"),
    ("depurar esto", "debug this"),
    ("crear una variable", "create a variable"),
    ("crear un bucle", "create a loop"),
    ("agregar una condición", "add a condition"),
    // French
    ("créer une fonction qui additionne deux nombres", "Create a function that adds two numbers"),
    ("écrire en python", "write in Python"),
    ("écrire en java", "write in Java"),
    ("créer un nouveau fichier", "create new file"),
    ("déboguer ceci", "debug this"),
    ("créer une variable", "create a variable"),
    ("créer une boucle", "create a loop"),
];

/// Translate a command phrase if it is in the table; otherwise pass it
/// through. Confidence distinguishes hit from passthrough.
pub fn translate_phrase(text: &str) -> TranslatedCommand {
    let trimmed = text.trim();
    let hit = PHRASE_TABLE
        .iter()
        .find(|(phrase, _)| phrase.eq_ignore_ascii_case(trimmed) || *phrase == trimmed);

    match hit {
        Some((_, english)) => TranslatedCommand {
            original_text: text.to_string(),
            translated_text: (*english).to_string(),
            detected_language: detect_spoken_language(text).to_string(),
            confidence: TRANSLATION_HIT_CONFIDENCE,
        },
        None => TranslatedCommand {
            original_text: text.to_string(),
            translated_text: text.to_string(),
            detected_language: detect_spoken_language(text).to_string(),
            confidence: TRANSLATION_MISS_CONFIDENCE,
        },
    }
}
