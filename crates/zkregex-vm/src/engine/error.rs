use zkregex_core::INPUT_SENTINEL;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuntimeError {
    /// The range check of the template rejects the byte.
    #[error("message byte {byte} at position {position} is not below {INPUT_SENTINEL}")]
    ByteOutOfRange { position: usize, byte: u8 },

    #[error("message has {len} bytes but the template takes {msg_bytes}")]
    InputTooLong { len: usize, msg_bytes: usize },

    #[error("op {op}: {reason}")]
    MalformedCircuit { op: usize, reason: String },

    #[error("reveal `{name}` reads missing gate and{gate}")]
    MalformedReveal { name: String, gate: usize },
}
