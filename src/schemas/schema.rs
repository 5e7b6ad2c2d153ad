use schemars::schema::RootSchema;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

/// Cached JSON schema handle associated with a response contract.
#[derive(Clone, Debug)]
pub struct SchemaHandle {
    schema_name: &'static str,
    type_name: &'static str,
    schema_json: Arc<Value>,
}

impl SchemaHandle {
    pub fn from_root_schema(
        schema_name: &'static str,
        type_name: &'static str,
        mut root: RootSchema,
    ) -> Self {
        let metadata = root.schema.metadata();
        if metadata.title.is_none() {
            metadata.title = Some(schema_name.to_string());
        }

        // A RootSchema always serializes; `true` accepts everything if it ever did not.
        let schema_json = serde_json::to_value(root).unwrap_or(Value::Bool(true));

        Self {
            schema_name,
            type_name,
            schema_json: Arc::new(schema_json),
        }
    }

    pub fn schema_name(&self) -> &'static str {
        self.schema_name
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn schema_json(&self) -> &Value {
        self.schema_json.as_ref()
    }
}

/// A JSON shape the content-generation service is expected to return.
pub trait ResponseContract: DeserializeOwned + Send + Sync + 'static {
    fn schema() -> &'static SchemaHandle;
}

/// Implement [`ResponseContract`] for types deriving `JsonSchema`, caching the schema
/// on first use.
macro_rules! response_contract {
    ($($ty:ty => $name:literal),+ $(,)?) => {
        $(
            impl $crate::schemas::ResponseContract for $ty {
                fn schema() -> &'static $crate::schemas::SchemaHandle {
                    static HANDLE: std::sync::OnceLock<$crate::schemas::SchemaHandle> =
                        std::sync::OnceLock::new();
                    HANDLE.get_or_init(|| {
                        $crate::schemas::SchemaHandle::from_root_schema(
                            $name,
                            std::any::type_name::<$ty>(),
                            schemars::schema_for!($ty),
                        )
                    })
                }
            }
        )+
    };
}

pub(crate) use response_contract;
