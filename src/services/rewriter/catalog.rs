// Rewrite Catalog
// Static marker, idiom and synonym tables plus the rule catalog.
// Built once and never mutated.

use rand::RngCore;
use regex::Regex;
use std::sync::LazyLock;

use super::transforms;
use crate::models::{Language, RuleKind, RuleTier};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerPosition {
    Start,
    Middle,
    End,
}

/// Literal text inserted at a sentence position. Start markers carry their own
/// trailing separator; middle and end markers carry their leading comma.
#[derive(Debug, Clone, Copy)]
pub struct Marker {
    pub text: &'static str,
    pub position: MarkerPosition,
}

const fn marker(text: &'static str, position: MarkerPosition) -> Marker {
    Marker { text, position }
}

use MarkerPosition::{End, Middle, Start};

const SPANISH_DISCOURSE_MARKERS: &[Marker] = &[
    marker(", bueno, ", Middle),
    marker(", pues, ", Middle),
    marker(", vamos, ", Middle),
    marker(", o sea, ", Middle),
    marker(", ya sabes, ", Middle),
    marker(", claro, ", Middle),
    marker("Mira, ", Start),
    marker("Pues ", Start),
    marker("Bueno, ", Start),
    marker("Vamos, ", Start),
    marker("La verdad es que ", Start),
    marker(", ¿no?", End),
    marker(", ¿sabes?", End),
    marker(", ¿entiendes?", End),
    marker(", claro está", End),
    marker(", por así decirlo", End),
];

const ENGLISH_DISCOURSE_MARKERS: &[Marker] = &[
    marker(", well, ", Middle),
    marker(", you know, ", Middle),
    marker(", I mean, ", Middle),
    marker(", honestly, ", Middle),
    marker("Look, ", Start),
    marker("Well, ", Start),
    marker("Honestly, ", Start),
    marker("The thing is, ", Start),
    marker(", right?", End),
    marker(", you know?", End),
    marker(", to be fair", End),
    marker(", more or less", End),
];

const SPANISH_PERSONAL_MARKERS: &[Marker] = &[
    marker("Yo creo que ", Start),
    marker("En mi opinión, ", Start),
    marker("Personalmente, ", Start),
    marker("Desde mi punto de vista, ", Start),
    marker("Por lo que he visto, ", Start),
    marker(", creo yo", End),
    marker(", en mi experiencia", End),
    marker(", por lo que sé", End),
    marker(", me parece", End),
];

const ENGLISH_PERSONAL_MARKERS: &[Marker] = &[
    marker("I think ", Start),
    marker("In my opinion, ", Start),
    marker("Personally, ", Start),
    marker("From what I've seen, ", Start),
    marker(", I think", End),
    marker(", in my experience", End),
    marker(", as far as I know", End),
    marker(", if you ask me", End),
];

pub fn discourse_markers(language: Language) -> &'static [Marker] {
    match language {
        Language::Spanish => SPANISH_DISCOURSE_MARKERS,
        Language::English => ENGLISH_DISCOURSE_MARKERS,
    }
}

pub fn personal_markers(language: Language) -> &'static [Marker] {
    match language {
        Language::Spanish => SPANISH_PERSONAL_MARKERS,
        Language::English => ENGLISH_PERSONAL_MARKERS,
    }
}

/// Plain phrase -> idiom. Longer "muy X" phrases come first.
const SPANISH_IDIOMS: &[(&str, &str)] = &[
    ("muy fácil", "pan comido"),
    ("muy caro", "un ojo de la cara"),
    ("muy obvio", "más claro que el agua"),
    ("muy rápido", "en un abrir y cerrar de ojos"),
    ("muy ocupado", "hasta arriba de trabajo"),
    ("muy nervioso", "con los nervios a flor de piel"),
    ("rápidamente", "en un abrir y cerrar de ojos"),
    ("quizás", "a lo mejor"),
    ("ocasionalmente", "de vez en cuando"),
    ("acertar", "dar en el clavo"),
    ("equivocarse", "meter la pata"),
    ("esforzarse", "ponerse las pilas"),
    ("rendirse", "tirar la toalla"),
    ("ayudar", "echar una mano"),
    ("estar harto", "estar hasta las narices"),
    ("desconocer", "no tener ni idea"),
];

const ENGLISH_IDIOMS: &[(&str, &str)] = &[
    ("very easy", "a piece of cake"),
    ("very expensive", "worth an arm and a leg"),
    ("very obvious", "as clear as day"),
    ("very quickly", "in the blink of an eye"),
    ("very busy", "up to my ears"),
    ("exactly right", "spot on"),
    ("occasionally", "once in a while"),
    ("give up", "throw in the towel"),
    ("help out", "lend a hand"),
];

const SPANISH_CLOSINGS: &[&str] = &[
    ", y eso es lo que hay",
    ", así son las cosas",
    ", no hay más que hablar",
    ", y punto",
    ", sin más vueltas",
];

const ENGLISH_CLOSINGS: &[&str] = &[
    ", and that's that",
    ", simple as that",
    ", end of story",
    ", no two ways about it",
];

pub fn closing_phrases(language: Language) -> &'static [&'static str] {
    match language {
        Language::Spanish => SPANISH_CLOSINGS,
        Language::English => ENGLISH_CLOSINGS,
    }
}

/// Formal phrase -> plainer alternatives.
const SPANISH_VARIANTS: &[(&str, &[&str])] = &[
    ("es importante", &["es crucial", "importa mucho"]),
    ("es necesario", &["hace falta"]),
    ("es evidente", &["salta a la vista"]),
    ("considero que", &["me parece que"]),
    ("en conclusión", &["para cerrar el tema", "total"]),
    ("además", &["también", "encima", "aparte"]),
    ("sin embargo", &["pero", "aunque", "igual"]),
    ("por lo tanto", &["así que", "entonces", "por eso"]),
    ("debido a", &["por", "gracias a"]),
    ("aproximadamente", &["más o menos", "cerca de"]),
    ("finalmente", &["al final", "para rematar"]),
    ("finalizar", &["acabar", "terminar"]),
    ("iniciar", &["empezar", "arrancar"]),
    ("obtener", &["conseguir", "lograr"]),
    ("realizar", &["hacer", "llevar a cabo"]),
    ("manifestar", &["decir", "comentar"]),
    ("efectuar", &["hacer"]),
    ("muy bueno", &["fantástico"]),
    ("muy malo", &["pésimo"]),
];

const ENGLISH_VARIANTS: &[(&str, &[&str])] = &[
    ("it is important", &["it matters", "it really counts"]),
    ("it is necessary", &["you need"]),
    ("in conclusion", &["to wrap up", "all in all"]),
    ("moreover", &["also", "plus"]),
    ("furthermore", &["also", "on top of that"]),
    ("however", &["but", "still"]),
    ("therefore", &["so", "that's why"]),
    ("approximately", &["about", "roughly"]),
    ("utilize", &["use"]),
    ("obtain", &["get"]),
    ("commence", &["start", "begin"]),
    ("finally", &["in the end"]),
];

/// Parenthetical asides spliced in at the sentence midpoint.
const SPANISH_ASIDES: &[&str] = &[
    " (y esto me parece fascinante)",
    " (aunque no todos estarían de acuerdo)",
    " (basado en mi experiencia)",
    " (y esto es solo mi opinión)",
    " (lo que resulta sorprendente)",
    " (como he podido comprobar)",
    " (y no me canso de repetirlo)",
    " (aunque podría estar equivocado)",
    " (y esto lo digo por experiencia propia)",
    " (y créeme que lo he visto muchas veces)",
];

const ENGLISH_ASIDES: &[&str] = &[
    " (as far as I can tell)",
    " (though not everyone would agree)",
    " (and that still surprises me)",
    " (if I'm being honest)",
    " (and I've seen it plenty of times)",
    " (though I could be wrong)",
    " (or so it seems to me)",
];

pub fn personal_asides(language: Language) -> &'static [&'static str] {
    match language {
        Language::Spanish => SPANISH_ASIDES,
        Language::English => ENGLISH_ASIDES,
    }
}

/// Opinion verb -> the same verb reached through a spoken self-correction.
const SPANISH_CORRECTIONS: &[(&str, &str)] = &[
    ("creo que", "pienso... no, creo que"),
    ("pienso que", "creo... mejor dicho, pienso que"),
    ("considero", "opino... o más bien considero"),
    ("opino que", "creo... bueno, opino que"),
];

const ENGLISH_CORRECTIONS: &[(&str, &str)] = &[
    ("I think", "I guess... no, I think"),
    ("I believe", "I think... or rather, I believe"),
    ("I feel", "I mean... well, I feel"),
];

/// Word -> emphatic or redundant restatement. Specific words come before the
/// bare intensifier and copula.
const SPANISH_EMPHASIS: &[(&str, &str)] = &[
    ("interesante", "interesante, muy interesante"),
    ("importante", "importante, incluso crucial"),
    ("difícil", "difícil, realmente complicado"),
    ("muy", "realmente muy"),
    ("es", "es realmente"),
];

const ENGLISH_EMPHASIS: &[(&str, &str)] = &[
    ("interesting", "interesting, really interesting"),
    ("important", "important, even crucial"),
    ("difficult", "difficult, really tricky"),
    ("very", "really very"),
    ("is", "is really"),
];

/// A table entry with its word-bounded, case-insensitive matcher.
pub struct PhraseEntry<T> {
    pub phrase: &'static str,
    pub pattern: Regex,
    pub value: T,
}

fn compile<T: Copy>(table: &[(&'static str, T)]) -> Vec<PhraseEntry<T>> {
    table
        .iter()
        .map(|&(phrase, value)| PhraseEntry {
            phrase,
            pattern: Regex::new(&format!(r"(?i)\b{}\b", regex::escape(phrase))).expect("phrase regex"),
            value,
        })
        .collect()
}

static SPANISH_IDIOM_TABLE: LazyLock<Vec<PhraseEntry<&'static str>>> = LazyLock::new(|| compile(SPANISH_IDIOMS));
static ENGLISH_IDIOM_TABLE: LazyLock<Vec<PhraseEntry<&'static str>>> = LazyLock::new(|| compile(ENGLISH_IDIOMS));
static SPANISH_VARIANT_TABLE: LazyLock<Vec<PhraseEntry<&'static [&'static str]>>> =
    LazyLock::new(|| compile(SPANISH_VARIANTS));
static ENGLISH_VARIANT_TABLE: LazyLock<Vec<PhraseEntry<&'static [&'static str]>>> =
    LazyLock::new(|| compile(ENGLISH_VARIANTS));

pub fn idiom_table(language: Language) -> &'static [PhraseEntry<&'static str>] {
    match language {
        Language::Spanish => &SPANISH_IDIOM_TABLE,
        Language::English => &ENGLISH_IDIOM_TABLE,
    }
}

pub fn variant_table(language: Language) -> &'static [PhraseEntry<&'static [&'static str]>] {
    match language {
        Language::Spanish => &SPANISH_VARIANT_TABLE,
        Language::English => &ENGLISH_VARIANT_TABLE,
    }
}

static SPANISH_CORRECTION_TABLE: LazyLock<Vec<PhraseEntry<&'static str>>> =
    LazyLock::new(|| compile(SPANISH_CORRECTIONS));
static ENGLISH_CORRECTION_TABLE: LazyLock<Vec<PhraseEntry<&'static str>>> =
    LazyLock::new(|| compile(ENGLISH_CORRECTIONS));
static SPANISH_EMPHASIS_TABLE: LazyLock<Vec<PhraseEntry<&'static str>>> = LazyLock::new(|| compile(SPANISH_EMPHASIS));
static ENGLISH_EMPHASIS_TABLE: LazyLock<Vec<PhraseEntry<&'static str>>> = LazyLock::new(|| compile(ENGLISH_EMPHASIS));

pub fn correction_table(language: Language) -> &'static [PhraseEntry<&'static str>] {
    match language {
        Language::Spanish => &SPANISH_CORRECTION_TABLE,
        Language::English => &ENGLISH_CORRECTION_TABLE,
    }
}

pub fn emphasis_table(language: Language) -> &'static [PhraseEntry<&'static str>] {
    match language {
        Language::Spanish => &SPANISH_EMPHASIS_TABLE,
        Language::English => &ENGLISH_EMPHASIS_TABLE,
    }
}

/// Per-sentence state handed to every rule.
pub struct RuleContext<'a> {
    pub rng: &'a mut dyn RngCore,
    pub language: Language,
    pub closing_probability: f64,
    /// Aggressive tier: markers prefer the sentence start and closing phrases
    /// skip their random draw.
    pub forced: bool,
    /// Byte length of the marker inserted at the start. Later rules leave it alone.
    pub prefix_len: usize,
    /// Set once something was inserted at the sentence start.
    pub start_taken: bool,
    /// Set once something was spliced in at the midpoint.
    pub middle_taken: bool,
    /// Set once something was inserted before the final punctuation.
    pub end_taken: bool,
}

impl<'a> RuleContext<'a> {
    pub fn new(rng: &'a mut dyn RngCore, language: Language, closing_probability: f64) -> Self {
        Self {
            rng,
            language,
            closing_probability,
            forced: false,
            prefix_len: 0,
            start_taken: false,
            middle_taken: false,
            end_taken: false,
        }
    }
}

/// What a rule did to a sentence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    pub text: String,
    pub detail: String,
}

pub struct RewriteRule {
    pub kind: RuleKind,
    /// Tiers whose candidate pool includes this rule.
    pub tiers: &'static [RuleTier],
    /// Structural predicate on the sentence as it was before any rule ran.
    pub applies: fn(&str) -> bool,
    pub apply: fn(&str, &mut RuleContext<'_>) -> Option<Rewrite>,
    /// Rules tried in its place by the aggressive tier when this one finds nothing to do.
    pub fallbacks: &'static [RuleKind],
}

fn always(_: &str) -> bool {
    true
}

const ALL_ACTIVE_TIERS: &[RuleTier] = &[RuleTier::Aggressive, RuleTier::Moderate, RuleTier::Minimal];
const UPPER_TIERS: &[RuleTier] = &[RuleTier::Aggressive, RuleTier::Moderate];
const LOWER_TIERS: &[RuleTier] = &[RuleTier::Moderate, RuleTier::Minimal];
const MODERATE_ONLY: &[RuleTier] = &[RuleTier::Moderate];

/// Rules in the fixed order the aggressive tier applies them. The last three
/// reach the aggressive tier only as fallbacks.
pub static RULE_CATALOG: [RewriteRule; 8] = [
    RewriteRule {
        kind: RuleKind::DiscourseMarker,
        tiers: ALL_ACTIVE_TIERS,
        applies: always,
        apply: transforms::add_discourse_marker,
        fallbacks: &[],
    },
    RewriteRule {
        kind: RuleKind::StructuralVariation,
        tiers: UPPER_TIERS,
        applies: transforms::is_simple_declarative,
        apply: transforms::vary_structure,
        fallbacks: &[],
    },
    RewriteRule {
        kind: RuleKind::IdiomSubstitution,
        tiers: ALL_ACTIVE_TIERS,
        applies: always,
        apply: transforms::substitute_idiom,
        fallbacks: &[RuleKind::PersonalAside],
    },
    RewriteRule {
        kind: RuleKind::LexicalVariation,
        tiers: UPPER_TIERS,
        applies: always,
        apply: transforms::increase_lexical_variety,
        fallbacks: &[RuleKind::EmphasisShift, RuleKind::SelfCorrection],
    },
    RewriteRule {
        kind: RuleKind::FirstPersonFraming,
        tiers: ALL_ACTIVE_TIERS,
        applies: always,
        apply: transforms::add_first_person_framing,
        fallbacks: &[RuleKind::PersonalAside],
    },
    RewriteRule {
        kind: RuleKind::PersonalAside,
        tiers: LOWER_TIERS,
        applies: always,
        apply: transforms::add_personal_aside,
        fallbacks: &[],
    },
    RewriteRule {
        kind: RuleKind::SelfCorrection,
        tiers: MODERATE_ONLY,
        applies: always,
        apply: transforms::add_self_correction,
        fallbacks: &[],
    },
    RewriteRule {
        kind: RuleKind::EmphasisShift,
        tiers: MODERATE_ONLY,
        applies: always,
        apply: transforms::shift_emphasis,
        fallbacks: &[],
    },
];

pub fn rule(kind: RuleKind) -> &'static RewriteRule {
    match kind {
        RuleKind::DiscourseMarker => &RULE_CATALOG[0],
        RuleKind::StructuralVariation => &RULE_CATALOG[1],
        RuleKind::IdiomSubstitution => &RULE_CATALOG[2],
        RuleKind::LexicalVariation => &RULE_CATALOG[3],
        RuleKind::FirstPersonFraming => &RULE_CATALOG[4],
        RuleKind::PersonalAside => &RULE_CATALOG[5],
        RuleKind::SelfCorrection => &RULE_CATALOG[6],
        RuleKind::EmphasisShift => &RULE_CATALOG[7],
    }
}

/// Rules eligible for a tier, in catalog order.
pub fn rules_for(tier: RuleTier) -> Vec<&'static RewriteRule> {
    RULE_CATALOG.iter().filter(|r| r.tiers.contains(&tier)).collect()
}
