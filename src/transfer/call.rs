//! Transfer call model shared by strategies and clients

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;

/// Transfer methods a client may expose
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransferMethod {
    /// Spot token transfer (`spotSend`)
    SpotTransfer,
    /// USDC transfer (`usdSend`)
    UsdTransfer,
}

impl TransferMethod {
    pub const ALL: [TransferMethod; 2] = [TransferMethod::SpotTransfer, TransferMethod::UsdTransfer];

    pub fn name(&self) -> &'static str {
        match self {
            TransferMethod::SpotTransfer => "spot_transfer",
            TransferMethod::UsdTransfer => "usd_transfer",
        }
    }
}

impl std::fmt::Display for TransferMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A single argument value
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    Str(String),
    Num(f64),
}

impl ArgValue {
    pub fn str(value: impl Into<String>) -> Self {
        ArgValue::Str(value.into())
    }
}

impl std::fmt::Display for ArgValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArgValue::Str(s) => write!(f, "'{}'", s),
            ArgValue::Num(n) => write!(f, "{:?}", n),
        }
    }
}

/// How arguments are passed to the method
#[derive(Debug, Clone, PartialEq)]
pub enum CallArgs {
    /// Keyword arguments, bound by name
    Named(Vec<(&'static str, ArgValue)>),
    /// Positional arguments, bound by the method's parameter order
    Positional(Vec<ArgValue>),
}

impl std::fmt::Display for CallArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CallArgs::Named(args) => {
                let parts: Vec<String> = args
                    .iter()
                    .map(|(name, value)| format!("'{}': {}", name, value))
                    .collect();
                write!(f, "{{{}}}", parts.join(", "))
            }
            CallArgs::Positional(args) => {
                let parts: Vec<String> = args.iter().map(ToString::to_string).collect();
                write!(f, "[{}]", parts.join(", "))
            }
        }
    }
}

impl CallArgs {
    /// Display form prefixed by how the arguments are passed
    pub fn labelled(&self) -> String {
        match self {
            CallArgs::Named(_) => format!("Parameters: {}", self),
            CallArgs::Positional(_) => format!("Arguments: {}", self),
        }
    }
}

/// A client that can execute transfer calls
#[async_trait]
pub trait TransferClient: Send + Sync {
    /// Whether the client exposes `method` at all
    fn supports(&self, method: TransferMethod) -> bool;

    /// Bind `args` to `method` and execute it, returning the exchange response
    async fn invoke(&self, method: TransferMethod, args: &CallArgs) -> Result<Value>;

    fn available_methods(&self) -> Vec<TransferMethod> {
        TransferMethod::ALL
            .into_iter()
            .filter(|method| self.supports(*method))
            .collect()
    }
}
