//! Server-side semantics of the in-memory ledger

use assert_matches::assert_matches;
use ricetrack_core::{PropertyDataType, PropertyValue, RecordId, Role, TrackError};
use ricetrack_client::{RecordReadApi, SubmissionChannel};
use ricetrack_protocol::{
    AnswerProposal, CreateProposal, CreateRecord, FinalizeRecord, Payload, PropertyInput,
    ProposalResponse, RevokeReporter, UpdateProperties,
};
use ricetrack_testkit::{test_agent, InMemoryLedger, RecordBuilder};

fn rice_properties() -> Vec<PropertyInput> {
    vec![
        PropertyInput::new("varietas", "Ciherang"),
        PropertyInput::new("harga", 10_000i64),
    ]
}

#[tokio::test]
async fn create_record_seeds_roles_reporters_and_history() {
    ricetrack_testkit::init_tracing();
    let ledger = InMemoryLedger::new();
    let alice = test_agent("alice", 1);
    let channel = ledger.channel(alice.key.clone());

    channel
        .submit(&[Payload::CreateRecord(CreateRecord {
            record_id: RecordId::new("RICE-1"),
            properties: rice_properties(),
        })])
        .await
        .unwrap();

    let record = ledger.fetch_record(&RecordId::new("RICE-1")).await.unwrap();
    assert_eq!(record.owner, alice.key);
    assert_eq!(record.custodian, alice.key);
    assert!(!record.is_final);
    assert!(record.is_reporter("varietas", &alice.key));
    assert_eq!(record.updates.owners.len(), 1);
    // Both initial property values share the creation timestamp
    assert_eq!(record.count_property_updates(), 1);
}

#[tokio::test]
async fn creating_the_same_record_twice_conflicts() {
    let ledger = InMemoryLedger::new();
    let alice = test_agent("alice", 1);
    let channel = ledger.channel(alice.key.clone());
    let create = Payload::CreateRecord(CreateRecord {
        record_id: RecordId::new("RICE-1"),
        properties: rice_properties(),
    });

    channel.submit(&[create.clone()]).await.unwrap();
    let err = channel.submit(&[create]).await.unwrap_err();
    assert_matches!(err, TrackError::Conflict { .. });
}

#[tokio::test]
async fn duplicate_proposal_per_tuple_conflicts() {
    let ledger = InMemoryLedger::new();
    let alice = test_agent("alice", 1);
    let bob = test_agent("bob", 2);
    let channel = ledger.channel(alice.key.clone());

    channel
        .submit(&[Payload::CreateRecord(CreateRecord {
            record_id: RecordId::new("RICE-1"),
            properties: rice_properties(),
        })])
        .await
        .unwrap();

    let propose = Payload::CreateProposal(CreateProposal {
        record_id: RecordId::new("RICE-1"),
        receiving_agent: bob.key.clone(),
        role: Role::Owner,
        properties: vec![],
    });
    channel.submit(&[propose.clone()]).await.unwrap();
    let err = channel.submit(&[propose]).await.unwrap_err();
    assert_matches!(err, TrackError::Conflict { .. });

    let record = ledger.fetch_record(&RecordId::new("RICE-1")).await.unwrap();
    assert_eq!(record.proposals.len(), 1);
}

#[tokio::test]
async fn failed_batch_leaves_state_untouched() {
    let ledger = InMemoryLedger::new();
    let alice = test_agent("alice", 1);
    let channel = ledger.channel(alice.key.clone());

    channel
        .submit(&[Payload::CreateRecord(CreateRecord {
            record_id: RecordId::new("RICE-1"),
            properties: rice_properties(),
        })])
        .await
        .unwrap();

    // Second payload names a property that does not exist; the first is
    // valid on its own but must not land.
    let err = channel
        .submit(&[
            Payload::UpdateProperties(UpdateProperties {
                record_id: RecordId::new("RICE-1"),
                properties: vec![PropertyInput::new("harga", 12_000i64)],
            }),
            Payload::UpdateProperties(UpdateProperties {
                record_id: RecordId::new("RICE-1"),
                properties: vec![PropertyInput::new("ghost", 1i64)],
            }),
        ])
        .await
        .unwrap_err();
    assert_matches!(err, TrackError::InvalidRequest { .. });

    let record = ledger.fetch_record(&RecordId::new("RICE-1")).await.unwrap();
    assert_eq!(
        record.property_value("harga").and_then(PropertyValue::as_int),
        Some(10_000)
    );
}

#[tokio::test]
async fn updates_in_one_batch_share_a_timestamp() {
    let ledger = InMemoryLedger::new();
    let alice = test_agent("alice", 1);
    let channel = ledger.channel(alice.key.clone());

    channel
        .submit(&[Payload::CreateRecord(CreateRecord {
            record_id: RecordId::new("RICE-1"),
            properties: rice_properties(),
        })])
        .await
        .unwrap();

    channel
        .submit(&[Payload::UpdateProperties(UpdateProperties {
            record_id: RecordId::new("RICE-1"),
            properties: vec![
                PropertyInput::new("varietas", "Mentik Wangi"),
                PropertyInput::new("harga", 12_000i64),
            ],
        })])
        .await
        .unwrap();

    let record = ledger.fetch_record(&RecordId::new("RICE-1")).await.unwrap();
    // Creation batch plus one update batch
    assert_eq!(record.count_property_updates(), 2);
}

#[tokio::test]
async fn revoke_touches_only_named_properties() {
    let ledger = InMemoryLedger::new();
    let alice = test_agent("alice", 1);
    let carol = test_agent("carol", 3);

    ledger.insert_record(
        RecordBuilder::new("RICE-1", alice.key.clone())
            .property(
                "lokasi",
                PropertyDataType::Location,
                None,
                vec![alice.key.clone(), carol.key.clone()],
            )
            .property(
                "harga",
                PropertyDataType::Int,
                None,
                vec![alice.key.clone(), carol.key.clone()],
            )
            .build(),
    );

    ledger
        .channel(alice.key.clone())
        .submit(&[Payload::RevokeReporter(RevokeReporter {
            record_id: RecordId::new("RICE-1"),
            reporter_id: carol.key.clone(),
            properties: vec!["lokasi".to_string()],
        })])
        .await
        .unwrap();

    let record = ledger.fetch_record(&RecordId::new("RICE-1")).await.unwrap();
    assert!(!record.is_reporter("lokasi", &carol.key));
    assert!(record.is_reporter("harga", &carol.key));
}

#[tokio::test]
async fn finalize_is_one_way_and_blocks_mutation() {
    let ledger = InMemoryLedger::new();
    let alice = test_agent("alice", 1);
    let bob = test_agent("bob", 2);
    let channel = ledger.channel(alice.key.clone());

    channel
        .submit(&[Payload::CreateRecord(CreateRecord {
            record_id: RecordId::new("RICE-1"),
            properties: rice_properties(),
        })])
        .await
        .unwrap();
    channel
        .submit(&[Payload::FinalizeRecord(FinalizeRecord {
            record_id: RecordId::new("RICE-1"),
        })])
        .await
        .unwrap();

    let again = channel
        .submit(&[Payload::FinalizeRecord(FinalizeRecord {
            record_id: RecordId::new("RICE-1"),
        })])
        .await
        .unwrap_err();
    assert_matches!(again, TrackError::Conflict { .. });

    let propose = channel
        .submit(&[Payload::CreateProposal(CreateProposal {
            record_id: RecordId::new("RICE-1"),
            receiving_agent: bob.key.clone(),
            role: Role::Custodian,
            properties: vec![],
        })])
        .await
        .unwrap_err();
    assert_matches!(propose, TrackError::Conflict { .. });

    let update = channel
        .submit(&[Payload::UpdateProperties(UpdateProperties {
            record_id: RecordId::new("RICE-1"),
            properties: vec![PropertyInput::new("harga", 1i64)],
        })])
        .await
        .unwrap_err();
    assert_matches!(update, TrackError::Conflict { .. });
}

#[tokio::test]
async fn answer_requires_the_right_identity() {
    let ledger = InMemoryLedger::new();
    let alice = test_agent("alice", 1);
    let bob = test_agent("bob", 2);
    let carol = test_agent("carol", 3);

    ledger.insert_record(
        RecordBuilder::new("RICE-1", alice.key.clone())
            .proposal(alice.key.clone(), bob.key.clone(), Role::Owner, vec![])
            .build(),
    );

    // Carol can neither accept for Bob nor cancel for Alice
    let accept = AnswerProposal {
        record_id: RecordId::new("RICE-1"),
        receiving_agent: bob.key.clone(),
        role: Role::Owner,
        response: ProposalResponse::Accept,
    };
    let err = ledger
        .channel(carol.key.clone())
        .submit(&[Payload::AnswerProposal(accept.clone())])
        .await
        .unwrap_err();
    assert_matches!(err, TrackError::Unauthorized { .. });

    let cancel = AnswerProposal {
        response: ProposalResponse::Cancel,
        ..accept.clone()
    };
    let err = ledger
        .channel(bob.key.clone())
        .submit(&[Payload::AnswerProposal(cancel)])
        .await
        .unwrap_err();
    assert_matches!(err, TrackError::Unauthorized { .. });

    // The receiving agent accepts; ownership moves and the proposal is gone
    ledger
        .channel(bob.key.clone())
        .submit(&[Payload::AnswerProposal(accept)])
        .await
        .unwrap();
    let record = ledger.fetch_record(&RecordId::new("RICE-1")).await.unwrap();
    assert_eq!(record.owner, bob.key);
    assert!(record.proposals.is_empty());
    assert_eq!(record.updates.owners.last().map(|u| &u.agent_key), Some(&bob.key));
}

#[tokio::test]
async fn answering_a_missing_proposal_reports_no_such_proposal() {
    let ledger = InMemoryLedger::new();
    let alice = test_agent("alice", 1);
    let bob = test_agent("bob", 2);
    ledger.insert_record(RecordBuilder::new("RICE-1", alice.key.clone()).build());

    let err = ledger
        .channel(bob.key.clone())
        .submit(&[Payload::AnswerProposal(AnswerProposal {
            record_id: RecordId::new("RICE-1"),
            receiving_agent: bob.key.clone(),
            role: Role::Owner,
            response: ProposalResponse::Accept,
        })])
        .await
        .unwrap_err();
    assert_matches!(err, TrackError::NoSuchProposal { .. });
}
