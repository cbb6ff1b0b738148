//! Tax rules configuration
//!
//! Deduction limits, allowance formulas and marginal rate bands are loaded
//! from TOML. Resolution order:
//! 1. Explicit path (CLI `--config`, or the `LAW2LEDGER_CONFIG` env var)
//! 2. Override in the data dir (~/.local/share/law2ledger/config/tax.toml)
//! 3. Embedded defaults (compiled into binary)
//!
//! Keys missing from a file keep their default values.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/tax.toml");

/// Env var naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "LAW2LEDGER_CONFIG";

/// How potential savings are computed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SavingsMode {
    /// Sum of capped deductions for the profile
    Derived,
    /// A fixed placeholder amount regardless of profile
    Fixed,
}

impl SavingsMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Derived => "derived",
            Self::Fixed => "fixed",
        }
    }
}

impl std::str::FromStr for SavingsMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "derived" => Ok(Self::Derived),
            "fixed" => Ok(Self::Fixed),
            _ => Err(format!("Unknown savings mode: {}", s)),
        }
    }
}

/// Statutory deduction ceilings (annual, in rupees)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeductionLimits {
    pub section_80c: f64,
    pub section_80ccd_1b: f64,
    pub section_80d_self: f64,
    pub section_80d_senior: f64,
    pub standard_deduction: f64,
}

impl Default for DeductionLimits {
    fn default() -> Self {
        Self {
            section_80c: 150_000.0,
            section_80ccd_1b: 50_000.0,
            section_80d_self: 25_000.0,
            section_80d_senior: 50_000.0,
            standard_deduction: 50_000.0,
        }
    }
}

/// HRA exemption formula inputs, as shares of income / basic salary
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HraRules {
    pub basic_salary_share: f64,
    pub allowance_share_of_basic: f64,
    pub exempt_share_of_basic: f64,
    pub rent_threshold_share_of_basic: f64,
}

impl Default for HraRules {
    fn default() -> Self {
        Self {
            basic_salary_share: 0.5,
            allowance_share_of_basic: 0.5,
            exempt_share_of_basic: 0.4,
            rent_threshold_share_of_basic: 0.1,
        }
    }
}

/// Section 80GG rent deduction inputs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RentDeductionRules {
    pub monthly_cap: f64,
    pub income_share: f64,
    pub rent_threshold_share: f64,
}

impl Default for RentDeductionRules {
    fn default() -> Self {
        Self {
            monthly_cap: 5_000.0,
            income_share: 0.25,
            rent_threshold_share: 0.1,
        }
    }
}

/// One marginal rate band; `up_to: None` marks the open-ended top band
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateBand {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub up_to: Option<f64>,
    pub rate: f64,
}

/// Complete tax rules configuration
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaxConfig {
    pub savings_mode: SavingsMode,
    pub fixed_savings: f64,
    pub limits: DeductionLimits,
    pub hra: HraRules,
    pub rent_deduction: RentDeductionRules,
    pub rate_bands: Vec<RateBand>,
}

impl Default for TaxConfig {
    fn default() -> Self {
        Self {
            savings_mode: SavingsMode::Derived,
            fixed_savings: 112_400.0,
            limits: DeductionLimits::default(),
            hra: HraRules::default(),
            rent_deduction: RentDeductionRules::default(),
            rate_bands: vec![
                RateBand {
                    up_to: Some(250_000.0),
                    rate: 0.0,
                },
                RateBand {
                    up_to: Some(500_000.0),
                    rate: 0.052,
                },
                RateBand {
                    up_to: Some(1_000_000.0),
                    rate: 0.208,
                },
                RateBand {
                    up_to: None,
                    rate: 0.312,
                },
            ],
        }
    }
}

impl TaxConfig {
    /// Load using the standard resolution order
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let explicit = explicit
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from));

        if let Some(path) = explicit {
            if !path.exists() {
                return Err(Error::Config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            return Self::from_file(&path);
        }

        if let Some(path) = default_config_path().filter(|p| p.exists()) {
            return Self::from_file(&path);
        }

        debug!("Using embedded tax config");
        Self::from_toml_str(DEFAULT_CONFIG)
    }

    /// Parse a specific config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))?;
        let config = Self::from_toml_str(&content)?;
        info!(path = %path.display(), mode = config.savings_mode.as_str(), "Loaded tax config");
        Ok(config)
    }

    /// Parse config from TOML content, filling gaps from defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let raw: RawConfig = toml::from_str(content)?;
        let mut config = TaxConfig::default();

        if let Some(savings) = raw.savings {
            if let Some(mode) = savings.mode {
                config.savings_mode = mode.parse().map_err(Error::Config)?;
            }
            if let Some(amount) = savings.fixed_amount {
                config.fixed_savings = amount;
            }
        }

        if let Some(limits) = raw.limits {
            let l = &mut config.limits;
            apply(&mut l.section_80c, limits.section_80c);
            apply(&mut l.section_80ccd_1b, limits.section_80ccd_1b);
            apply(&mut l.section_80d_self, limits.section_80d_self);
            apply(&mut l.section_80d_senior, limits.section_80d_senior);
            apply(&mut l.standard_deduction, limits.standard_deduction);
        }

        if let Some(hra) = raw.hra {
            let h = &mut config.hra;
            apply(&mut h.basic_salary_share, hra.basic_salary_share);
            apply(&mut h.allowance_share_of_basic, hra.allowance_share_of_basic);
            apply(&mut h.exempt_share_of_basic, hra.exempt_share_of_basic);
            apply(
                &mut h.rent_threshold_share_of_basic,
                hra.rent_threshold_share_of_basic,
            );
        }

        if let Some(rent) = raw.rent_deduction {
            let r = &mut config.rent_deduction;
            apply(&mut r.monthly_cap, rent.monthly_cap);
            apply(&mut r.income_share, rent.income_share);
            apply(&mut r.rent_threshold_share, rent.rent_threshold_share);
        }

        if let Some(bands) = raw.rate_bands {
            if !bands.is_empty() {
                config.rate_bands = bands;
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Check internal consistency
    pub fn validate(&self) -> Result<()> {
        if !non_negative(self.fixed_savings) {
            return Err(Error::Config("savings.fixed_amount must be >= 0".into()));
        }

        let limits = [
            ("limits.section_80c", self.limits.section_80c),
            ("limits.section_80ccd_1b", self.limits.section_80ccd_1b),
            ("limits.section_80d_self", self.limits.section_80d_self),
            ("limits.section_80d_senior", self.limits.section_80d_senior),
            ("limits.standard_deduction", self.limits.standard_deduction),
            ("rent_deduction.monthly_cap", self.rent_deduction.monthly_cap),
        ];
        for (key, value) in limits {
            if !non_negative(value) {
                return Err(Error::Config(format!("{} must be >= 0", key)));
            }
        }

        let shares = [
            ("hra.basic_salary_share", self.hra.basic_salary_share),
            ("hra.allowance_share_of_basic", self.hra.allowance_share_of_basic),
            ("hra.exempt_share_of_basic", self.hra.exempt_share_of_basic),
            (
                "hra.rent_threshold_share_of_basic",
                self.hra.rent_threshold_share_of_basic,
            ),
            ("rent_deduction.income_share", self.rent_deduction.income_share),
            (
                "rent_deduction.rent_threshold_share",
                self.rent_deduction.rent_threshold_share,
            ),
        ];
        for (key, value) in shares {
            if !(0.0..=1.0).contains(&value) {
                return Err(Error::Config(format!("{} must be between 0 and 1", key)));
            }
        }

        let Some((last, rest)) = self.rate_bands.split_last() else {
            return Err(Error::Config("at least one rate band is required".into()));
        };
        if last.up_to.is_some() {
            return Err(Error::Config(
                "the last rate band must not have an upper bound".into(),
            ));
        }
        let mut previous = 0.0;
        for band in rest {
            let Some(up_to) = band.up_to else {
                return Err(Error::Config(
                    "only the last rate band may omit up_to".into(),
                ));
            };
            if up_to <= previous {
                return Err(Error::Config("rate bands must ascend".into()));
            }
            previous = up_to;
        }
        for band in &self.rate_bands {
            if !(0.0..=1.0).contains(&band.rate) {
                return Err(Error::Config("rate must be between 0 and 1".into()));
            }
        }

        Ok(())
    }

    /// Marginal rate applying to an income (band lookup, inclusive upper bound)
    pub fn marginal_rate(&self, income: f64) -> f64 {
        self.rate_bands
            .iter()
            .find(|band| band.up_to.map_or(true, |limit| income <= limit))
            .map(|band| band.rate)
            .unwrap_or(0.0)
    }

    /// 80D ceiling for the given age band
    pub fn section_80d_limit(&self, senior: bool) -> f64 {
        if senior {
            self.limits.section_80d_senior
        } else {
            self.limits.section_80d_self
        }
    }

    /// Render the effective config as TOML
    pub fn to_toml(&self) -> Result<String> {
        let raw = RawConfig {
            savings: Some(RawSavings {
                mode: Some(self.savings_mode.as_str().to_string()),
                fixed_amount: Some(self.fixed_savings),
            }),
            limits: Some(RawLimits {
                section_80c: Some(self.limits.section_80c),
                section_80ccd_1b: Some(self.limits.section_80ccd_1b),
                section_80d_self: Some(self.limits.section_80d_self),
                section_80d_senior: Some(self.limits.section_80d_senior),
                standard_deduction: Some(self.limits.standard_deduction),
            }),
            hra: Some(RawHra {
                basic_salary_share: Some(self.hra.basic_salary_share),
                allowance_share_of_basic: Some(self.hra.allowance_share_of_basic),
                exempt_share_of_basic: Some(self.hra.exempt_share_of_basic),
                rent_threshold_share_of_basic: Some(self.hra.rent_threshold_share_of_basic),
            }),
            rent_deduction: Some(RawRentDeduction {
                monthly_cap: Some(self.rent_deduction.monthly_cap),
                income_share: Some(self.rent_deduction.income_share),
                rent_threshold_share: Some(self.rent_deduction.rent_threshold_share),
            }),
            rate_bands: Some(self.rate_bands.clone()),
        };
        toml::to_string_pretty(&raw).map_err(|e| Error::Config(e.to_string()))
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("law2ledger").join("config").join("tax.toml"))
}

fn apply(target: &mut f64, value: Option<f64>) {
    if let Some(v) = value {
        *target = v;
    }
}

fn non_negative(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}

/// Raw config structure for TOML parsing
#[derive(Debug, Default, Serialize, Deserialize)]
struct RawConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    savings: Option<RawSavings>,
    #[serde(skip_serializing_if = "Option::is_none")]
    limits: Option<RawLimits>,
    #[serde(skip_serializing_if = "Option::is_none")]
    hra: Option<RawHra>,
    #[serde(skip_serializing_if = "Option::is_none")]
    rent_deduction: Option<RawRentDeduction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    rate_bands: Option<Vec<RateBand>>,
}

#[derive(Debug, Serialize, Deserialize)]
struct RawSavings {
    mode: Option<String>,
    fixed_amount: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize)]
struct RawLimits {
    section_80c: Option<f64>,
    section_80ccd_1b: Option<f64>,
    section_80d_self: Option<f64>,
    section_80d_senior: Option<f64>,
    standard_deduction: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize)]
struct RawHra {
    basic_salary_share: Option<f64>,
    allowance_share_of_basic: Option<f64>,
    exempt_share_of_basic: Option<f64>,
    rent_threshold_share_of_basic: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize)]
struct RawRentDeduction {
    monthly_cap: Option<f64>,
    income_share: Option<f64>,
    rent_threshold_share: Option<f64>,
}
