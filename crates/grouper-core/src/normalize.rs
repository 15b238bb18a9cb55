//! Locality text normalization.
//!
//! Raw locality strings are rewritten by a fixed, ordered list of rules.
//! Order is load-bearing: later families assume the canonical forms produced
//! by earlier ones. Road rules run before compass expansion so that the
//! letters in "u.s." and "i-35" are consumed before single-letter compass
//! rules can read them as directions; unit rules run before the shorthand
//! and cardinal rules that look for canonical unit words.
//!
//! The rule list is reapplied until the text reaches a fixed point, which
//! makes `normalize(normalize(x)) == normalize(x)`.

use std::sync::LazyLock;

use regex::Captures;

use crate::config::NormalizeConfig;
use crate::rules::{Guard, Rule};

const DIRECTION_ALTERNATION: &str =
    "northeast|northwest|southeast|southwest|north|south|east|west";

/// Ordinal words converted to their numeric-suffix form.
const ORDINAL_WORDS: &[(&str, &str)] = &[
    ("first", "1st"),
    ("second", "2nd"),
    ("third", "3rd"),
    ("fourth", "4th"),
    ("fifth", "5th"),
    ("sixth", "6th"),
    ("seventh", "7th"),
    ("eighth", "8th"),
    ("ninth", "9th"),
    ("tenth", "10th"),
    ("eleventh", "11th"),
    ("twelfth", "12th"),
    ("thirteenth", "13th"),
    ("fourteenth", "14th"),
    ("fifteenth", "15th"),
    ("sixteenth", "16th"),
    ("seventeenth", "17th"),
    ("eighteenth", "18th"),
    ("nineteenth", "19th"),
    ("twentieth", "20th"),
];

/// Cardinal words, longest first so "seventeen" is tried before "seven".
const CARDINAL_WORDS: &[(&str, u32)] = &[
    ("seventeen", 17),
    ("thirteen", 13),
    ("fourteen", 14),
    ("eighteen", 18),
    ("nineteen", 19),
    ("fifteen", 15),
    ("sixteen", 16),
    ("eleven", 11),
    ("twelve", 12),
    ("twenty", 20),
    ("three", 3),
    ("seven", 7),
    ("eight", 8),
    ("four", 4),
    ("five", 5),
    ("nine", 9),
    ("one", 1),
    ("two", 2),
    ("six", 6),
    ("ten", 10),
];

/// Fractions recognised in slash and glyph form.
const FRACTIONS: &[(&str, char, f64)] = &[
    ("1/2", '½', 0.5),
    ("1/4", '¼', 0.25),
    ("3/4", '¾', 0.75),
    ("1/3", '⅓', 0.33),
    ("2/3", '⅔', 0.66),
    ("1/8", '⅛', 0.125),
];

/// Abbreviation expansions, applied in order as whole words with an
/// optional trailing period.
const ABBREVIATIONS: &[(&str, &str)] = &[
    ("jct", "junction"),
    ("jnct", "junction"),
    ("st", "street"),
    ("cir", "circle"),
    ("ave", "avenue"),
    ("blvd", "boulevard"),
    ("rte", "route"),
    ("rt", "route"),
    ("dr", "drive"),
    ("rd", "road"),
    ("hwy", "highway"),
    ("hiway", "highway"),
    ("mtns", "mountains"),
    ("mts", "mountains"),
    ("mtn", "mountain"),
    ("mt", "mountain"),
    ("ft", "fort"),
    ("cp", "camp"),
    ("bldg", "building"),
    ("riv", "river"),
    ("crk", "creek"),
    ("ck", "creek"),
    ("lk", "lake"),
    ("spgs", "springs"),
    ("spr", "spring"),
    ("isl", "island"),
    ("natl", "national"),
    ("univ", "university"),
    ("sec", "section"),
    ("twp", "township"),
    ("co", "county"),
    ("okla", "oklahoma"),
    ("ok", "oklahoma"),
    ("tex", "texas"),
    ("tx", "texas"),
    ("ark", "arkansas"),
    ("ar", "arkansas"),
    ("wma", "wildlife management area"),
    ("nra", "national recreation area"),
];

/// Render a number the way normalized text carries it: integral values
/// without a decimal point, others rounded to three places.
pub(crate) fn render_number(value: f64) -> String {
    let rounded = (value * 1000.0).round() / 1000.0;
    if rounded.fract() == 0.0 && rounded.abs() < i64::MAX as f64 {
        format!("{}", rounded as i64)
    } else {
        format!("{rounded}")
    }
}

fn compass_letter(letters: &str) -> Option<&'static str> {
    match letters {
        "n" => Some("north"),
        "s" => Some("south"),
        "e" => Some("east"),
        "w" => Some("west"),
        "ne" => Some("northeast"),
        "nw" => Some("northwest"),
        "se" => Some("southeast"),
        "sw" => Some("southwest"),
        _ => None,
    }
}

/// Expand a three-letter compass point ("nne") to its hyphenated words.
/// Only combinations whose leading letter belongs to the trailing diagonal
/// are real compass points; anything else is left alone.
fn compass_triple(letters: &str) -> Option<String> {
    let (head, tail) = letters.split_at(1);
    let diagonal = compass_letter(tail).filter(|_| tail.len() == 2)?;
    if !tail.contains(head) {
        return None;
    }
    Some(format!("{}-{}", compass_letter(head)?, diagonal))
}

fn fraction_value(slash: &str) -> Option<f64> {
    FRACTIONS
        .iter()
        .find(|(s, _, _)| *s == slash)
        .map(|(_, _, v)| *v)
}

fn glyph_value(glyph: char) -> Option<f64> {
    FRACTIONS
        .iter()
        .find(|(_, g, _)| *g == glyph)
        .map(|(_, _, v)| *v)
}

fn cardinal_value(word: &str) -> Option<f64> {
    if let Ok(n) = word.parse::<f64>() {
        return Some(n);
    }
    CARDINAL_WORDS
        .iter()
        .find(|(w, _)| *w == word)
        .map(|(_, n)| f64::from(*n))
}

fn spelled_fraction(numerator: &str, denominator: &str) -> Option<f64> {
    let num = match numerator {
        "a" | "one" => 1,
        "two" => 2,
        "three" => 3,
        _ => return None,
    };
    let den = match denominator {
        "half" => 2,
        "third" | "thirds" => 3,
        "quarter" | "quarters" | "fourth" | "fourths" => 4,
        _ => return None,
    };
    // "a third" reads as an ordinal far more often than a fraction
    if numerator == "a" && den == 3 {
        return None;
    }
    fraction_value(&format!("{num}/{den}"))
}

/// Drop a locality prefix that is repeated verbatim after the first semicolon.
fn dedupe_repeated_prefix(text: &str) -> String {
    if let Some((prefix, rest)) = text.split_once(';') {
        let prefix = prefix.trim();
        if !prefix.is_empty() && rest.contains(prefix) {
            return rest.trim().to_string();
        }
    }
    text.to_string()
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn boilerplate_rules() -> Vec<Rule> {
    vec![
        Rule::transform("lowercase", |t| t.to_lowercase()),
        Rule::replace(
            "unicode-spaces",
            r"[\x{00A0}\x{2000}-\x{200B}\x{202F}\x{205F}\x{3000}]",
            " ",
        ),
        Rule::transform("repeated-prefix", dedupe_repeated_prefix),
        Rule::replace("verbatim-bracketed", r"[(\[]\s*verbatim\s*[)\]]", " "),
        Rule::replace("verbatim", r"\bverbatim\b:?", " "),
        Rule::replace(
            "no-additional-data",
            r"\[?\s*\bno additional locality data(?:\s+on\s+sheet)?\s*\]?",
            " ",
        ),
        Rule::replace("collected-abbrev", r"\bcoll\b\.?", "collected"),
        Rule::replace(
            "collected-preposition",
            r"\bcollected\s+(?:from|in|at|on|along|near)\b",
            " ",
        ),
        Rule::replace("collected-leading", r"^\s*collected\b[\s,:\-]*", ""),
        Rule::replace(
            "approximate-qualifier",
            r"\b(?:approximately|approx|about|circa|ca)\b\.?\s*",
            "",
        ),
        Rule::replace("possessive", r"\b(\w+)['’]s\b", "${1}s"),
        Rule::replace("hash", "#", ""),
    ]
}

fn unit_rules(meters_cutoff: f64) -> Vec<Rule> {
    vec![
        Rule::replace_with(
            "distance-shorthand",
            r"\b(\d+(?:\.\d+)?)\s*(mi|km)\.?\s*(ne|nw|se|sw|n|s|e|w)",
            |caps: &Captures<'_>| {
                let unit = if &caps[2] == "km" { "kilometers" } else { "miles" };
                let direction = compass_letter(&caps[3]).unwrap_or("");
                format!("{} {unit} {direction}", &caps[1])
            },
        )
        .guarded(Guard::NotBeforeWord),
        Rule::replace(
            "glued-unit",
            r"\b(\d+(?:\.\d+)?)(miles?|kilometers?|km|mi|ft|feet|meters?|m)\b",
            "${1} ${2}",
        ),
        Rule::replace("mi", r"\bmi\b", "miles"),
        Rule::replace("km", r"\bkm\b", "kilometers"),
        Rule::replace("feet-abbrev", r"\b(\d+(?:\.\d+)?)\s*ft\b\.?", "${1} feet"),
        Rule::replace("feet-mark", r"\b(\d+(?:\.\d+)?)\s*['’]", "${1} feet "),
        Rule::replace_with(
            "meters-or-miles",
            r"\b(\d+(?:\.\d+)?)\s*m\b\.?",
            move |caps: &Captures<'_>| match caps[1].parse::<f64>() {
                Ok(n) => {
                    let unit = if n > meters_cutoff { "meters" } else { "miles" };
                    format!("{} {unit}", render_number(n))
                }
                Err(_) => caps[0].to_string(),
            },
        ),
        Rule::replace_with(
            "singular-unit",
            r"\b(mile|kilometer|meter|foot)\b",
            |caps: &Captures<'_>| {
                match &caps[1] {
                    "foot" => "feet",
                    "mile" => "miles",
                    "kilometer" => "kilometers",
                    _ => "meters",
                }
                .to_string()
            },
        ),
        Rule::replace("whitespace", r"\s+", " "),
    ]
}

fn road_rules() -> Vec<Rule> {
    vec![
        Rule::replace(
            "state-highway-numbered",
            r"\bstate\s+(?:highway|hiway|hwy)\.?\s*(\d+)\b",
            "highway ${1}",
        ),
        Rule::replace(
            "st-hwy-numbered",
            r"\bst\.?\s*hwy\.?\s*(\d+)\b",
            "highway ${1}",
        ),
        Rule::replace("sh-numbered", r"\bsh\s*(\d+)\b", "highway ${1}"),
        Rule::replace("state-numbered", r"\bstate\s+(\d+)\b", "highway ${1}"),
        Rule::replace("hy-numbered", r"\bhy\s*(\d+)\b", "highway ${1}"),
        Rule::replace(
            "state-highway-bare",
            r"\b(?:state\s+(?:highway|hiway|hwy)|st\.?\s*hwy|sh)\b\.?",
            "highway",
        ),
        // "ok 9" is a highway, "ok 9 miles" is a state followed by a distance
        Rule::replace_with(
            "state-name-highway",
            r"\b(?:texas|tex|tx|oklahoma|okla|ok)\.?\s+(\d+)\b(\s*(?:miles|kilometers|meters|feet)\b)?",
            |caps: &Captures<'_>| {
                if caps.get(2).is_some() {
                    caps[0].to_string()
                } else {
                    format!("highway {}", &caps[1])
                }
            },
        ),
        Rule::replace(
            "us-highway-numbered",
            r"\bu\.?\s*s\.?\s*(?:highway|hwy)\.?\s*(\d+)\b",
            "highway ${1}",
        ),
        Rule::replace("ush-numbered", r"\bush\s*(\d+)\b", "highway ${1}"),
        Rule::replace("us-numbered", r"\bu\.?\s*s\.?\s*(\d+)\b", "highway ${1}"),
        Rule::replace(
            "us-highway-bare",
            r"\b(?:u\.?\s*s\.?|ush)\s+(?:highway|hwy)\b\.?",
            "highway",
        ),
        Rule::replace("interstate-numbered", r"\binterstate\s*(\d+)\b", "highway ${1}"),
        Rule::replace("i-numbered", r"\bi[.\-\s]?(\d+)\b", "highway ${1}"),
        Rule::replace(
            "farm-to-market",
            r"\b(?:farm[\s\-]*to[\s\-]*market(?:[\s\-]+road)?|f\.?\s*m\.?(?:\s*road|\s*rd\.?)?)\s*(\d+)\b",
            "fm ${1}",
        ),
        Rule::replace(
            "county-road-numbered",
            r"\b(?:c\.?\s*r\.?|co\.?\s*(?:rd\.?|road)|county\s+(?:rd\.?|road))\s*(\d+)\b",
            "county road ${1}",
        ),
        Rule::replace("county-road-bare", r"\bco(?:unty)?\.?\s+rd\b\.?", "county road"),
        Rule::replace("usa", r"\bu\.?\s*s\.?\s*a\b\.?", " "),
        Rule::replace("us-dotted", r"\bu\.\s?s\.", "us"),
    ]
}

fn direction_rules() -> Vec<Rule> {
    vec![
        Rule::replace_with(
            "compass-triple",
            r"([nsew])\.?([nsew])\.?([nsew])",
            |caps: &Captures<'_>| {
                let letters = format!("{}{}{}", &caps[1], &caps[2], &caps[3]);
                compass_triple(&letters).unwrap_or_else(|| caps[0].to_string())
            },
        )
        .guarded(Guard::Isolated),
        Rule::replace_with(
            "compass-pair",
            r"([ns])(?:\.\s?|\s)?([ew])",
            |caps: &Captures<'_>| {
                let letters = format!("{}{}", &caps[1], &caps[2]);
                compass_letter(&letters).unwrap_or_default().to_string()
            },
        )
        .guarded(Guard::Isolated),
        Rule::replace_with(
            "compass-letter",
            "[nsew]",
            |caps: &Captures<'_>| compass_letter(&caps[0]).unwrap_or_default().to_string(),
        )
        .guarded(Guard::IsolatedLetter),
        Rule::replace(
            "compass-join",
            r"\b(north|south)[.\s\-]+(east|west)\b",
            "${1}${2}",
        ),
        Rule::replace(
            "compass-compound",
            r"\b(north|south|east|west)[\s\-]+(northeast|northwest|southeast|southwest)\b",
            "${1}-${2}",
        ),
    ]
}

fn abbreviation_rules() -> Vec<Rule> {
    let mut rules = vec![
        Rule::replace("railroad", r"\br[.\-\s]?r\b\.?", "railroad"),
        Rule::replace("river-dotted", r"\br\.", "river").guarded(Guard::NotBeforeWord),
    ];
    rules.extend(ABBREVIATIONS.iter().map(|&(abbr, full)| {
        Rule::replace("abbreviation", &format!(r"\b{abbr}\b\.?"), full)
    }));
    rules.push(Rule::replace("ampersand", r"[&+]", " and "));
    // county names travel in their own column; "county road" stays
    rules.push(Rule::replace_with(
        "county-name",
        r"\b(\w+)\s+county\b(\s+road\b)?",
        |caps: &Captures<'_>| {
            let word = &caps[1];
            let keep = caps.get(2).is_some()
                || word == "road"
                || word == "county"
                || word.chars().all(|c| c.is_ascii_digit());
            if keep {
                caps[0].to_string()
            } else {
                String::new()
            }
        },
    ));
    rules
}

fn number_word_rules() -> Vec<Rule> {
    let cardinals = CARDINAL_WORDS
        .iter()
        .map(|(w, _)| *w)
        .collect::<Vec<_>>()
        .join("|");
    let ordinals = ORDINAL_WORDS
        .iter()
        .map(|(w, _)| *w)
        .collect::<Vec<_>>()
        .join("|");

    vec![
        // fractions first so "one half" is not split by the cardinal rule
        Rule::replace_with(
            "spelled-fraction",
            &format!(
                r"\b(?:(\d+|{cardinals})\s+(?:and\s+)?)?(a|one|two|three)[\s\-]+(half|thirds?|quarters?|fourths?)\b"
            ),
            |caps: &Captures<'_>| {
                let Some(fraction) = spelled_fraction(&caps[2], &caps[3]) else {
                    return caps[0].to_string();
                };
                let whole = caps.get(1).and_then(|m| cardinal_value(m.as_str()));
                render_number(whole.unwrap_or(0.0) + fraction)
            },
        ),
        Rule::replace_with(
            "ordinal-word",
            &format!(r"\b({ordinals})\b"),
            |caps: &Captures<'_>| {
                ORDINAL_WORDS
                    .iter()
                    .find(|(w, _)| *w == &caps[1])
                    .map_or_else(|| caps[0].to_string(), |(_, n)| n.to_string())
            },
        ),
        Rule::replace_with(
            "cardinal-before-unit",
            &format!(
                r"\b({cardinals})\s*(miles|kilometers|meters|feet|{DIRECTION_ALTERNATION})\b"
            ),
            |caps: &Captures<'_>| match cardinal_value(&caps[1]) {
                Some(n) => format!("{} {}", render_number(n), &caps[2]),
                None => caps[0].to_string(),
            },
        ),
    ]
}

fn fraction_rules() -> Vec<Rule> {
    vec![
        Rule::replace_with(
            "mixed-ascii-fraction",
            r"\b(\d+)\s+(\d/\d)\b",
            |caps: &Captures<'_>| {
                match (caps[1].parse::<f64>(), fraction_value(&caps[2])) {
                    (Ok(whole), Some(frac)) => render_number(whole + frac),
                    _ => caps[0].to_string(),
                }
            },
        ),
        Rule::replace_with(
            "mixed-unicode-fraction",
            r"\b(\d+)\s*([½¼¾⅓⅔⅛])",
            |caps: &Captures<'_>| {
                let glyph = caps[2].chars().next().and_then(glyph_value);
                match (caps[1].parse::<f64>(), glyph) {
                    (Ok(whole), Some(frac)) => render_number(whole + frac),
                    _ => caps[0].to_string(),
                }
            },
        ),
        Rule::replace_with("ascii-fraction", r"\b(\d/\d)\b", |caps: &Captures<'_>| {
            fraction_value(&caps[1]).map_or_else(|| caps[0].to_string(), render_number)
        }),
        Rule::replace_with("unicode-fraction", "[½¼¾⅓⅔⅛]", |caps: &Captures<'_>| {
            caps[0]
                .chars()
                .next()
                .and_then(glyph_value)
                .map_or_else(|| caps[0].to_string(), |v| format!(" {} ", render_number(v)))
        }),
    ]
}

fn numeric_cleanup_rules() -> Vec<Rule> {
    vec![
        Rule::replace("leading-decimal", r"(^|\s)\.(\d+)", "${1}0.${2}"),
        Rule::replace("integer-period", r"\b(\d+)\.", "${1}").guarded(Guard::NotBeforeDigit),
        Rule::replace(
            "of-a-unit",
            r"\b(\d+(?:\.\d+)?)\s+of\s+an?\s+(miles|kilometers|meters)\b",
            "${1} ${2}",
        ),
        Rule::replace("zero-decimal", r"\b(\d+)\.0+\b", "${1}"),
        Rule::replace(
            "bare-number-direction",
            &format!(r"\b(\d+(?:\.\d+)?)\s*({DIRECTION_ALTERNATION})\b"),
            "${1} miles ${2}",
        ),
    ]
}

fn final_rules() -> Vec<Rule> {
    vec![
        Rule::replace("stray-period", r"\.", " ").guarded(Guard::NotBetweenDigits),
        Rule::replace(
            "protect-compound-hyphen",
            r"\b(north|south|east|west)-(northeast|northwest|southeast|southwest)\b",
            "${1}\u{E000}${2}",
        ),
        Rule::replace("punctuation", r"[^\w\s.\x{E000}]", " "),
        Rule::replace("restore-compound-hyphen", r"\x{E000}", "-"),
        Rule::transform("collapse-whitespace", collapse_whitespace),
    ]
}

/// Ordered rewrite pipeline for raw locality strings.
#[derive(Debug)]
pub struct Normalizer {
    rules: Vec<Rule>,
    max_passes: usize,
}

impl Normalizer {
    pub fn new(config: &NormalizeConfig) -> Self {
        let mut rules = boilerplate_rules();
        rules.extend(unit_rules(config.meters_cutoff));
        rules.extend(road_rules());
        rules.extend(direction_rules());
        rules.extend(abbreviation_rules());
        rules.extend(number_word_rules());
        rules.extend(fraction_rules());
        rules.extend(numeric_cleanup_rules());
        rules.extend(final_rules());
        Self {
            rules,
            max_passes: config.max_passes.max(1),
        }
    }

    /// One pass of every rule, in order.
    pub fn apply_rules(&self, text: &str) -> String {
        self.rules
            .iter()
            .fold(text.to_string(), |acc, rule| rule.apply(&acc))
    }

    /// Canonical form of a raw locality. Null or blank input yields `""`.
    pub fn normalize(&self, raw: Option<&str>) -> String {
        let Some(raw) = raw.filter(|r| !r.trim().is_empty()) else {
            return String::new();
        };

        let mut current = self.apply_rules(raw);
        for _ in 1..self.max_passes {
            let next = self.apply_rules(&current);
            if next == current {
                return current;
            }
            current = next;
        }
        let unsettled: Vec<&str> = self
            .rules
            .iter()
            .filter(|rule| rule.apply(&current) != current)
            .map(Rule::name)
            .collect();
        if !unsettled.is_empty() {
            tracing::warn!(
                "normalization of {raw:?} did not settle within {} passes (still rewriting: {})",
                self.max_passes,
                unsettled.join(", ")
            );
        }
        current
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(&NormalizeConfig::default())
    }
}

static DEFAULT_NORMALIZER: LazyLock<Normalizer> = LazyLock::new(Normalizer::default);

/// Normalize with the default configuration.
pub fn normalize(raw: Option<&str>) -> String {
    DEFAULT_NORMALIZER.normalize(raw)
}
