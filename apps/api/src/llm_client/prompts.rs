// Shared prompt fragments. Each service that needs completion calls defines its own
// prompts.rs alongside it; this file only holds cross-cutting instructions.

/// Marker every generated bullet line must start with.
pub const SENTINEL: &str = ">>";

/// System instruction sent with every bullet-generation call.
pub const BULLET_SYSTEM: &str = "You are a specialized resume optimization AI focused on \
    seamlessly integrating keywords while preserving achievement metrics. \
    Your MOST IMPORTANT requirement is to prefix every bullet point with >>.";
