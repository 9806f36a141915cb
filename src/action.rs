//! Agent-facing action descriptors
//!
//! An action is a named, self-describing entry point: a usage prompt, a
//! statically declared input field list, and an invocation that always
//! answers with a single string.

use crate::error::DepositError;
use crate::executor::{self, Outcome};
use crate::protocols::Protocol;
use crate::wallet::WalletClient;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Map, Value};

/// JSON type a field must carry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    String,
    Number,
    Boolean,
}

impl FieldType {
    fn json_name(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Number => "number",
            FieldType::Boolean => "boolean",
        }
    }

    fn matches(&self, value: &Value) -> bool {
        match self {
            FieldType::String => value.is_string(),
            FieldType::Number => value.is_number(),
            FieldType::Boolean => value.is_boolean(),
        }
    }
}

/// One declared input field
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub field_type: FieldType,
    pub required: bool,
    pub description: &'static str,
}

/// Statically declared input fields of an action
#[derive(Debug, Clone, Copy)]
pub struct InputSchema {
    fields: &'static [FieldSpec],
}

impl InputSchema {
    pub const fn new(fields: &'static [FieldSpec]) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &'static [FieldSpec] {
        self.fields
    }

    /// Check presence and type of every declared field.
    ///
    /// Undeclared fields are ignored. Value constraints beyond the JSON type
    /// are left to the invocation.
    pub fn validate<'a>(&self, input: &'a Value) -> Result<&'a Map<String, Value>, DepositError> {
        let object = input
            .as_object()
            .ok_or_else(|| DepositError::InvalidInput("expected a JSON object".to_string()))?;

        for field in self.fields {
            match object.get(field.name) {
                None | Some(Value::Null) if field.required => {
                    return Err(DepositError::InvalidInput(format!(
                        "missing required field '{}'",
                        field.name
                    )));
                }
                Some(value) if !value.is_null() && !field.field_type.matches(value) => {
                    return Err(DepositError::InvalidInput(format!(
                        "field '{}' must be a {}",
                        field.name,
                        field.field_type.json_name()
                    )));
                }
                _ => {}
            }
        }

        Ok(object)
    }
}

/// Input fields shared by every deposit action
pub static DEPOSIT_INPUT: InputSchema = InputSchema::new(&[FieldSpec {
    name: "amount",
    field_type: FieldType::String,
    required: true,
    description: "The quantity of Ether to deposit",
}]);

/// Input of a deposit action
///
/// After validation `amount` is still the caller's decimal string.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, JsonSchema)]
pub struct DepositRequest {
    /// The quantity of Ether to deposit
    pub amount: String,
}

impl DepositRequest {
    pub fn from_input(input: &Value) -> Result<Self, DepositError> {
        DEPOSIT_INPUT.validate(input)?;
        serde_json::from_value(input.clone()).map_err(|e| DepositError::InvalidInput(e.to_string()))
    }
}

/// A deposit action bound to one protocol
#[derive(Debug, Clone, Copy)]
pub struct ActionDescriptor {
    protocol: &'static Protocol,
    schema: &'static InputSchema,
}

impl ActionDescriptor {
    pub fn deposit(protocol: &'static Protocol) -> Self {
        Self {
            protocol,
            schema: &DEPOSIT_INPUT,
        }
    }

    pub fn name(&self) -> &'static str {
        self.protocol.action_name
    }

    pub fn description(&self) -> &'static str {
        self.protocol.description
    }

    pub fn input_schema(&self) -> &'static InputSchema {
        self.schema
    }

    pub fn protocol(&self) -> &'static Protocol {
        self.protocol
    }

    /// JSON Schema of the input, advertised to agents
    pub fn json_schema(&self) -> Value {
        Value::from(schemars::schema_for!(DepositRequest))
    }

    /// Validate and execute, keeping the structured outcome
    pub async fn run(&self, wallet: &dyn WalletClient, input: &Value) -> Outcome {
        match DepositRequest::from_input(input) {
            Ok(request) => executor::execute(self.protocol, wallet, &request).await,
            Err(e) => {
                tracing::warn!(action = self.name(), error = %e, "Rejected action input");
                Outcome::Failed(e)
            }
        }
    }

    /// Validate and execute, answering with the agent-facing string
    pub async fn invoke(&self, wallet: &dyn WalletClient, input: &Value) -> String {
        self.run(wallet, input)
            .await
            .render(self.protocol.display_name)
    }
}
