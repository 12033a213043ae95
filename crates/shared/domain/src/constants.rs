//! Shared string constants (OpenAPI tags, factor keys, environment prefix).

/// OpenAPI tag for system endpoints.
pub const SYSTEM_TAG: &str = "System";
/// OpenAPI tag for calculator endpoints.
pub const CALCULATORS_TAG: &str = "Calculators";
/// OpenAPI tag for conversion factor endpoints.
pub const FACTORS_TAG: &str = "Conversion factors";

/// Prefix for environment overrides (`ZELO__FACTORS__URL`, ...).
pub const ENV_PREFIX: &str = "ZELO";

/// kg of crystal sugar -> L of liquid sugar.
pub const CRYSTAL_TO_LIQUID: &str = "cristal_to_liquido";
/// L of liquid sugar -> kg of crystal sugar.
pub const LIQUID_TO_CRYSTAL: &str = "liquido_to_cristal";
/// Citric acid correction factor.
pub const CITRIC_ACID_FACTOR: &str = "acido_citrico_fator";
/// Prefix of the Brix temperature correction keys (`brix_correcao_temp.25`).
pub const BRIX_TEMPERATURE_PREFIX: &str = "brix_correcao_temp.";
