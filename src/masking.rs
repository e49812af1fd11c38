use once_cell::sync::Lazy;
use regex::Regex;

use crate::patterns::RegexClass;

// Anchored: a class matches a whole token, never a substring.
static RE_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^-?[0-9]+$").unwrap());

static RE_HEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^0x[0-9A-Fa-f]+$").unwrap());

static RE_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z]+$").unwrap());

static RE_SYMBOL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[+\-/=<>%^()]+$").unwrap());

pub static NUMBER: RegexClass = RegexClass::new("Number", r"-?[0-9]+", &RE_NUMBER);

pub static HEX_NUMBER: RegexClass = RegexClass::new("HexNumber", r"0x[0-9A-Fa-f]+", &RE_HEX);

pub static WORD: RegexClass = RegexClass::new("Word", r"[a-zA-Z]+", &RE_WORD);

pub static SYMBOL: RegexClass = RegexClass::new("Symbol", r"[+\-/=<>%^()]+", &RE_SYMBOL);

/// Forces compilation of every class regex up front.
pub fn prewarm_regexes() {
    for class in [&NUMBER, &HEX_NUMBER, &WORD, &SYMBOL] {
        Lazy::force(class.lazy());
    }
}
