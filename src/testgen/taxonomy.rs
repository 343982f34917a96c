//! Hardware-group taxonomy.
//!
//! Symbols are grouped by naming convention. The table below is evaluated in
//! order and the first matching predicate decides: if its extractor then
//! fails, the symbol is dropped without trying later entries.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

static SPI_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(SPI_\d+(?:_\w+)?)_(?:TxBuf|RxBuf|Ctrl|TxLim)").unwrap());
static CAN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(CAN_\d+)").unwrap());
static PWM_IN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^((?:PWM_IN|DIG_FREQ_IN)_\d+(?:_\w+)?)_w\d+").unwrap());
static ADC_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^((?:ANA_IN|ADC)_\d+)").unwrap());

const DIG_IN_MARKERS: [&str; 6] = ["DIG_IN_", "WAKE", "FAULT", "DETECT", "INT", "FB_"];
const DIG_OUT_MARKERS: [&str; 4] = ["DIG_OUT_", "_DO_", "_EN", "_SEL_"];

/// Group name for symbols no rule recognizes.
pub const UNCLASSIFIED: &str = "UNCLASSIFIED";

/// Hardware category of a group.
///
/// Variants are declared in the alphabetical order of their tags so that the
/// derived ordering sorts [`GroupKey`]s like their `tag:name` text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    Adc,
    Can,
    DigIn,
    DigOut,
    Generic,
    PwmIn,
    PwmOut,
    Spi,
}

impl Category {
    /// Short lowercase tag (`spi`, `pwm_out`, ...).
    pub fn tag(self) -> &'static str {
        match self {
            Category::Adc => "adc",
            Category::Can => "can",
            Category::DigIn => "dig_in",
            Category::DigOut => "dig_out",
            Category::Generic => "generic",
            Category::PwmIn => "pwm_in",
            Category::PwmOut => "pwm_out",
            Category::Spi => "spi",
        }
    }

    /// Uppercase label used in the menu and comments.
    pub fn label(self) -> String {
        self.tag().to_ascii_uppercase()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Identifies one hardware group: `spi:SPI_00`, `dig_in:DIGITAL_IN`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupKey {
    pub category: Category,
    pub name: String,
}

impl GroupKey {
    pub fn new(category: Category, name: impl Into<String>) -> Self {
        Self {
            category,
            name: name.into(),
        }
    }

    /// Key collecting symbols that matched no rule.
    pub fn unclassified() -> Self {
        Self::new(Category::Generic, UNCLASSIFIED)
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.category, self.name)
    }
}

struct Rule {
    category: Category,
    matches: fn(&str) -> bool,
    extract: fn(&str) -> Option<String>,
}

fn capture(re: &Regex, symbol: &str) -> Option<String> {
    re.captures(symbol)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

fn contains_any(symbol: &str, markers: &[&str]) -> bool {
    markers.iter().any(|m| symbol.contains(m))
}

static RULES: [Rule; 7] = [
    Rule {
        category: Category::Spi,
        matches: |s| s.starts_with("SPI_"),
        extract: |s| capture(&SPI_RE, s),
    },
    Rule {
        category: Category::Can,
        matches: |s| s.starts_with("CAN_"),
        extract: |s| capture(&CAN_RE, s),
    },
    Rule {
        category: Category::PwmOut,
        matches: |s| s.contains("PWM_OUT_") || s.contains("OUT_PWM_"),
        extract: |s| {
            (s.contains("_low") || s.contains("_high"))
                .then(|| s.replace("_low", "").replace("_high", ""))
        },
    },
    Rule {
        category: Category::PwmIn,
        matches: |s| s.contains("PWM_IN_") || s.contains("DIG_FREQ_IN_"),
        extract: |s| capture(&PWM_IN_RE, s),
    },
    Rule {
        category: Category::Adc,
        matches: |s| s.starts_with("ANA_IN_") || s.starts_with("ADC_"),
        extract: |s| capture(&ADC_RE, s),
    },
    Rule {
        category: Category::DigIn,
        matches: |s| contains_any(s, &DIG_IN_MARKERS),
        extract: |_| Some("DIGITAL_IN".to_string()),
    },
    Rule {
        category: Category::DigOut,
        matches: |s| contains_any(s, &DIG_OUT_MARKERS),
        extract: |_| Some("DIGITAL_OUT".to_string()),
    },
];

/// Find the hardware group a symbol belongs to.
pub fn classify(symbol: &str) -> Option<GroupKey> {
    let rule = RULES.iter().find(|r| (r.matches)(symbol))?;
    let name = (rule.extract)(symbol)?;
    Some(GroupKey::new(rule.category, name))
}
