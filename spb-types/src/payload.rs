pub use crate::generated::sparkplug_payload::{payload::*, *};

pub use prost::Message;

impl Metric {
    pub fn new() -> Self {
        Self {
            name: None,
            alias: None,
            timestamp: None,
            datatype: None,
            is_historical: None,
            is_transient: None,
            is_null: Some(true),
            metadata: None,
            properties: None,
            value: None,
        }
    }

    pub fn set_name<S: Into<String>>(&mut self, name: S) -> &mut Self {
        self.name = Some(name.into());
        self
    }

    pub fn set_alias(&mut self, alias: u64) -> &mut Self {
        self.alias = Some(alias);
        self
    }

    pub fn set_datatype(&mut self, datatype: DataType) -> &mut Self {
        self.datatype = Some(datatype as u32);
        self
    }

    pub fn set_timestamp(&mut self, timestamp: u64) -> &mut Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn set_value(&mut self, value: metric::Value) -> &mut Self {
        self.value = Some(value);
        self.is_null = None;
        self
    }

    pub fn set_null(&mut self) -> &mut Self {
        self.value = None;
        self.is_null = Some(true);
        self
    }

    pub fn set_properties(&mut self, properties: PropertySet) -> &mut Self {
        self.properties = Some(properties);
        self
    }

    pub fn set_metadata(&mut self, metadata: MetaData) -> &mut Self {
        self.metadata = Some(metadata);
        self
    }
}

impl Payload {
    /// Create a payload stamped with `timestamp` carrying `metrics`
    pub fn with_metrics(timestamp: u64, metrics: Vec<Metric>) -> Self {
        Self {
            timestamp: Some(timestamp),
            metrics,
            seq: None,
            uuid: None,
            body: None,
        }
    }
}

impl TryFrom<u32> for DataType {
    type Error = ();

    fn try_from(v: u32) -> Result<Self, Self::Error> {
        let code = i32::try_from(v).map_err(|_| ())?;
        DataType::try_from(code).map_err(|_| ())
    }
}
