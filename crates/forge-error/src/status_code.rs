//! Unified status codes for error classification.
//!
//! Status code format: XX_YYY (5-digit)
//! - XX = Category (00-99)
//! - YYY = Code within category (000-999)

use strum::AsRefStr;
use strum::EnumIter;
use strum::FromRepr;

/// Status code metadata.
#[derive(Debug, Clone, Copy)]
pub struct StatusMeta {
    pub retryable: bool,
    pub log_error: bool,
    pub category: StatusCategory,
}

/// Status code category, following the error taxonomy of the
/// orchestration engine (kinds, not type names).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCategory {
    /// Success (00_xxx)
    Success,
    /// Internal/unexpected errors (01_xxx)
    Internal,
    /// Tool parameter validation (02_xxx)
    Validation,
    /// Workspace/command policy violations (03_xxx)
    Policy,
    /// Deadlines on streams, tools, LSP queries (04_xxx)
    Timeout,
    /// Upstream LLM provider errors (05_xxx)
    Provider,
    /// Tool handler failures (06_xxx)
    ToolExecution,
    /// Disk/file resource errors (07_xxx)
    Resource,
    /// Thread-store invariant violations (08_xxx)
    State,
    /// Loop-detection / iteration-budget termination (09_xxx)
    Budget,
}

macro_rules! define_status_codes {
    ($(
        $(#[$attr:meta])*
        $name:ident = $value:expr => {
            retryable: $retry:expr,
            log_error: $log:expr,
            category: $cat:ident $(,)?
        }
    ),* $(,)?) => {
        /// Status codes for error classification.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr, EnumIter, FromRepr)]
        #[repr(i32)]
        pub enum StatusCode {
            $($(#[$attr])* $name = $value,)*
        }

        impl StatusCode {
            /// Returns the metadata for this status code.
            pub const fn meta(&self) -> StatusMeta {
                match self {
                    $(Self::$name => StatusMeta {
                        retryable: $retry,
                        log_error: $log,
                        category: StatusCategory::$cat,
                    },)*
                }
            }

            /// Returns the string name of this status code.
            pub const fn name(&self) -> &'static str {
                match self {
                    $(Self::$name => stringify!($name),)*
                }
            }
        }

        const _: () = {
            const CODES: &[i32] = &[$($value),*];
            const fn check_unique() {
                let mut i = 0;
                while i < CODES.len() {
                    let mut j = i + 1;
                    while j < CODES.len() {
                        if CODES[i] == CODES[j] {
                            panic!("duplicate status code value");
                        }
                        j += 1;
                    }
                    i += 1;
                }
            }
            check_unique();
        };
    };
}

define_status_codes! {
    /// Operation succeeded.
    Success = 00_000 => { retryable: false, log_error: false, category: Success },

    /// Unknown/uncategorized error.
    Unknown = 01_000 => { retryable: false, log_error: true, category: Internal },
    /// Invariant violation detected at a store boundary; should be impossible.
    Internal = 01_001 => { retryable: false, log_error: true, category: Internal },
    /// The turn or tool was cancelled cooperatively.
    Cancelled = 01_002 => { retryable: false, log_error: false, category: Internal },

    /// Tool parameters failed schema validation.
    ValidationFailed = 02_000 => { retryable: false, log_error: false, category: Validation },
    /// Raw tool-call JSON could not be repaired into valid JSON.
    MalformedToolCall = 02_001 => { retryable: false, log_error: false, category: Validation },

    /// Path resolves outside the workspace roots.
    WorkspaceBoundaryViolation = 03_000 => { retryable: false, log_error: false, category: Policy },
    /// Path matches the sensitive-path blocklist.
    SensitivePathDenied = 03_001 => { retryable: false, log_error: false, category: Policy },
    /// Command rejected by the shell/subcommand allowlist.
    DeniedByPolicy = 03_002 => { retryable: false, log_error: false, category: Policy },
    /// User declined to approve a gated tool call.
    ApprovalDenied = 03_003 => { retryable: false, log_error: false, category: Policy },

    /// LLM stream exceeded its deadline.
    StreamTimeout = 04_000 => { retryable: true, log_error: false, category: Timeout },
    /// A tool or LSP query exceeded its deadline.
    ToolTimeout = 04_001 => { retryable: true, log_error: false, category: Timeout },

    /// Upstream provider returned a retryable error (e.g. 429, 5xx).
    ProviderRetryable = 05_000 => { retryable: true, log_error: true, category: Provider },
    /// Upstream provider returned a terminal error.
    ProviderTerminal = 05_001 => { retryable: false, log_error: true, category: Provider },

    /// A tool handler panicked, errored, or exited non-zero.
    ToolHandlerFailed = 06_000 => { retryable: false, log_error: true, category: ToolExecution },
    /// No handler registered for the requested tool name.
    ToolNotFound = 06_001 => { retryable: false, log_error: false, category: ToolExecution },

    /// Underlying disk I/O failed.
    IoError = 07_000 => { retryable: false, log_error: true, category: Resource },
    /// Referenced file does not exist.
    FileNotFound = 07_001 => { retryable: false, log_error: false, category: Resource },
    /// File exceeds a configured size limit.
    FileTooLarge = 07_002 => { retryable: false, log_error: false, category: Resource },
    /// Disk full / write failed for capacity reasons.
    DiskFull = 07_003 => { retryable: false, log_error: true, category: Resource },

    /// A thread-store invariant was violated (should be impossible).
    InvariantViolation = 08_000 => { retryable: false, log_error: true, category: State },
    /// Operation referenced an id that does not exist in the store.
    UnknownEntity = 08_001 => { retryable: false, log_error: false, category: State },

    /// Repetition thresholds exceeded; the loop aborted.
    LoopDetected = 09_000 => { retryable: false, log_error: false, category: Budget },
    /// Maximum tool-loop iterations reached for this turn.
    BudgetExceeded = 09_001 => { retryable: false, log_error: false, category: Budget },
}

impl StatusCode {
    /// Returns true if `code` is success.
    pub fn is_success(code: i32) -> bool {
        Self::Success as i32 == code
    }

    /// Returns true if the error is retryable.
    pub const fn is_retryable(&self) -> bool {
        self.meta().retryable
    }

    /// Returns true if the error should be logged.
    pub const fn should_log_error(&self) -> bool {
        self.meta().log_error
    }

    /// Returns the category of this status code.
    pub const fn category(&self) -> StatusCategory {
        self.meta().category
    }

    /// Convert from an `i32` wire value.
    pub fn from_i32(value: i32) -> Option<Self> {
        Self::from_repr(value)
    }
}

impl std::fmt::Display for StatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

#[cfg(test)]
#[path = "status_code.test.rs"]
mod tests;
