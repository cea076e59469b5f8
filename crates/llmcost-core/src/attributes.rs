//! Attribute keys read and written on telemetry records
//!
//! These follow the OpenTelemetry GenAI semantic conventions and are a fixed
//! wire contract: downstream dashboards query them by exact name.

/// Provider identifier, e.g. `openai`
pub const PROVIDER: &str = "gen_ai.system";

/// Model reported by the provider's response
pub const RESPONSE_MODEL: &str = "gen_ai.response.model";

/// Model declared on the request; used when the response model is absent
pub const REQUEST_MODEL: &str = "gen_ai.request.model";

pub const INPUT_TOKENS: &str = "gen_ai.usage.input_tokens";
pub const OUTPUT_TOKENS: &str = "gen_ai.usage.output_tokens";

/// Total cost in USD (input + output)
pub const COST: &str = "gen_ai.usage.cost";
pub const INPUT_COST: &str = "gen_ai.usage.input_cost";
pub const OUTPUT_COST: &str = "gen_ai.usage.output_cost";
