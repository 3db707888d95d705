//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading scoring
//! policies and amortization settings from YAML files.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::error::{EngineError, EngineResult};

use super::types::{AmortizationPolicy, PolicyTable};

/// Loads and provides access to engine configuration.
///
/// # Directory Structure
///
/// ```text
/// config/
/// ├── amortization.yaml   # EMI calculator settings (optional)
/// └── policies/
///     ├── flag.yaml       # One file per scoring policy
///     └── threshold.yaml
/// ```
///
/// # Example
///
/// ```no_run
/// use loan_risk_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config").unwrap();
/// let policy = loader.policy("threshold").unwrap();
/// println!("Loaded policy {} v{}", policy.name, policy.version);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    policies: BTreeMap<String, PolicyTable>,
    amortization: AmortizationPolicy,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// Returns an error if the `policies` directory is missing or empty, if
    /// any file contains invalid YAML, or if any policy fails validation.
    /// A missing `amortization.yaml` falls back to
    /// [`AmortizationPolicy::default`].
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let policies = Self::load_policies(&path.join("policies"))?;

        let amortization_path = path.join("amortization.yaml");
        let amortization = if amortization_path.exists() {
            Self::load_yaml::<AmortizationPolicy>(&amortization_path)?
        } else {
            debug!(
                path = %amortization_path.display(),
                "No amortization settings found, using defaults"
            );
            AmortizationPolicy::default()
        };

        let loader = Self::from_parts(policies, amortization)?;
        info!(
            config_dir = %path.display(),
            policies = loader.policies.len(),
            "Loaded engine configuration"
        );
        Ok(loader)
    }

    /// Builds a loader from already-parsed policies.
    ///
    /// Every policy is validated and names must be unique.
    pub fn from_parts(
        policies: Vec<PolicyTable>,
        amortization: AmortizationPolicy,
    ) -> EngineResult<Self> {
        amortization.validate()?;
        let mut by_name = BTreeMap::new();

        for policy in policies {
            policy.validate()?;
            Self::log_policy_diagnostics(&policy);

            if by_name.contains_key(&policy.name) {
                return Err(EngineError::InvalidPolicy {
                    policy: policy.name.clone(),
                    message: "another policy with this name is already loaded".to_string(),
                });
            }
            by_name.insert(policy.name.clone(), policy);
        }

        Ok(Self {
            policies: by_name,
            amortization,
        })
    }

    fn log_policy_diagnostics(policy: &PolicyTable) {
        for factor in policy.non_exhaustive_factors() {
            warn!(
                policy = %policy.name,
                factor = %factor,
                "Factor has no catch-all branch; some applicants may not be covered"
            );
        }

        if let Some((min, max)) = policy
            .score_range()
            .filter(|(min, max)| *min < 0 || *max > 100)
        {
            warn!(
                policy = %policy.name,
                min_score = min,
                max_score = max,
                "Policy score range extends outside 0..=100"
            );
        }
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Loads all policy files from the policies directory.
    fn load_policies(policies_dir: &Path) -> EngineResult<Vec<PolicyTable>> {
        let policies_dir_str = policies_dir.display().to_string();

        if !policies_dir.exists() {
            return Err(EngineError::ConfigNotFound {
                path: policies_dir_str,
            });
        }

        let entries = fs::read_dir(policies_dir).map_err(|_| EngineError::ConfigNotFound {
            path: policies_dir_str.clone(),
        })?;

        let mut policies = Vec::new();

        for entry in entries {
            let entry = entry.map_err(|_| EngineError::ConfigNotFound {
                path: policies_dir_str.clone(),
            })?;

            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "yaml") {
                let policy = Self::load_yaml::<PolicyTable>(&path)?;
                debug!(policy = %policy.name, version = %policy.version, "Loaded policy file");
                policies.push(policy);
            }
        }

        if policies.is_empty() {
            return Err(EngineError::ConfigNotFound {
                path: format!("{} (no policy files found)", policies_dir_str),
            });
        }

        Ok(policies)
    }

    /// Gets a policy by name.
    ///
    /// Returns [`EngineError::PolicyNotFound`] for an unknown name.
    pub fn policy(&self, name: &str) -> EngineResult<&PolicyTable> {
        self.policies
            .get(name)
            .ok_or_else(|| EngineError::PolicyNotFound {
                name: name.to_string(),
            })
    }

    /// Returns all loaded policies ordered by name.
    pub fn policies(&self) -> impl Iterator<Item = &PolicyTable> {
        self.policies.values()
    }

    /// Returns the amortization settings.
    pub fn amortization(&self) -> &AmortizationPolicy {
        &self.amortization
    }
}
