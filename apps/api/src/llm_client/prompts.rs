// Shared prompt constants.
// Each feature that needs LLM calls keeps its own prompts.rs alongside it.

/// System instruction sent with every extraction call.
pub const RESUME_PARSER_SYSTEM: &str = "You are an expert resume parser.";

/// Sampling temperature for extraction; output must be deterministic.
pub const EXTRACTION_TEMPERATURE: f32 = 0.0;
