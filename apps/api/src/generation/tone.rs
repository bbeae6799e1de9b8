//! Tone calibration: maps the brief's free-text tone to concrete style cues
//! for the prompt. Unknown labels fall back to `Professional`.

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Tone {
    #[default]
    Professional,
    Conversational,
    Authoritative,
    Friendly,
    Persuasive,
}

impl Tone {
    pub fn from_label(label: &str) -> Tone {
        match label.trim().to_lowercase().as_str() {
            "conversational" | "casual" => Tone::Conversational,
            "authoritative" | "expert" | "formal" => Tone::Authoritative,
            "friendly" | "warm" => Tone::Friendly,
            "persuasive" | "sales" => Tone::Persuasive,
            _ => Tone::Professional,
        }
    }
}

/// Style cues and phrases to steer away from, for one tone.
#[derive(Debug, Clone)]
pub struct ToneGuide {
    pub description: &'static str,
    pub cues: Vec<&'static str>,
    pub avoid: Vec<&'static str>,
}

pub fn get_tone_guide(tone: Tone) -> ToneGuide {
    match tone {
        Tone::Professional => ToneGuide {
            description: "professional, engaging",
            cues: vec![
                "Clear, precise sentences",
                "Confident but measured claims",
                "Industry terms explained on first use",
            ],
            avoid: vec!["slang", "exclamation marks", "hype"],
        },
        Tone::Conversational => ToneGuide {
            description: "conversational, approachable",
            cues: vec![
                "Address the reader as \"you\"",
                "Short paragraphs and contractions",
                "Relatable everyday examples",
            ],
            avoid: vec!["jargon", "passive voice", "long academic sentences"],
        },
        Tone::Authoritative => ToneGuide {
            description: "authoritative, expert",
            cues: vec![
                "Cite concrete figures and standards",
                "Explain the reasoning behind each recommendation",
                "Precise technical vocabulary",
            ],
            avoid: vec!["hedging", "filler phrases", "unsupported claims"],
        },
        Tone::Friendly => ToneGuide {
            description: "friendly, encouraging",
            cues: vec![
                "Warm, supportive phrasing",
                "Celebrate small wins for the reader",
                "Simple step-by-step explanations",
            ],
            avoid: vec!["condescension", "dense terminology"],
        },
        Tone::Persuasive => ToneGuide {
            description: "persuasive, benefit-driven",
            cues: vec![
                "Lead with reader benefits",
                "Address common objections",
                "Strong calls to action",
            ],
            avoid: vec!["false urgency", "unverifiable superlatives"],
        },
    }
}
