//! Snapshot builders for tests that bypass the payload path

use ricetrack_core::{
    Property, PropertyDataType, PropertyValue, Proposal, PublicKey, Record, RecordId,
    RecordUpdates, Role,
};

/// Builds `Record` snapshots in arbitrary states
#[derive(Debug, Clone)]
pub struct RecordBuilder {
    record: Record,
}

impl RecordBuilder {
    /// Start a record owned and held by `owner`
    pub fn new(record_id: impl Into<String>, owner: PublicKey) -> Self {
        Self {
            record: Record {
                record_id: RecordId::new(record_id),
                custodian: owner.clone(),
                owner,
                is_final: false,
                properties: vec![],
                proposals: vec![],
                updates: RecordUpdates::default(),
            },
        }
    }

    /// Set the custodian independently of the owner
    pub fn custodian(mut self, custodian: PublicKey) -> Self {
        self.record.custodian = custodian;
        self
    }

    /// Mark the record final
    pub fn finalized(mut self) -> Self {
        self.record.is_final = true;
        self
    }

    /// Add a property with an explicit reporter list
    pub fn property(
        mut self,
        name: impl Into<String>,
        data_type: PropertyDataType,
        value: Option<PropertyValue>,
        reporters: Vec<PublicKey>,
    ) -> Self {
        self.record.properties.push(Property {
            name: name.into(),
            data_type,
            value,
            reporters,
        });
        self
    }

    /// Add an outstanding proposal
    pub fn proposal(
        mut self,
        issuing_agent: PublicKey,
        receiving_agent: PublicKey,
        role: Role,
        properties: Vec<String>,
    ) -> Self {
        self.record.proposals.push(Proposal {
            record_id: self.record.record_id.clone(),
            issuing_agent,
            receiving_agent,
            role,
            properties,
        });
        self
    }

    /// Finish the snapshot
    pub fn build(self) -> Record {
        self.record
    }
}
