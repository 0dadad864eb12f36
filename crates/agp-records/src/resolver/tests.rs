//! # Resolver Shell Tests

use agp_envelope::{CodecConfig, EnvelopeError, PayloadCodec, Signed};
use serde_json::{json, Map, Value};
use shared_types::{ActorId, Session, SessionToken};
use uuid::Uuid;

use crate::adapters::session::StaticSessionGate;
use crate::adapters::workbook::CsvWorkbookRenderer;
use crate::domain::catalog::FarmRecord;
use crate::domain::errors::{RegistryError, SessionError};
use crate::ports::inbound::RecordRegistryApi;
use crate::ports::outbound::{FixedTimeSource, InMemoryRecordStore, SequentialIdGenerator};
use crate::service::{RecordService, RegistryConfig};

use super::payloads::{CreateRequest, DeleteRequest, ListRequest, QueryResult};
use super::RecordResolver;

type TestResolver = RecordResolver<
    InMemoryRecordStore,
    FixedTimeSource,
    SequentialIdGenerator,
    StaticSessionGate<FixedTimeSource>,
>;

const TOKEN: &str = "tok-alpha";

fn codec() -> PayloadCodec {
    PayloadCodec::new(CodecConfig::from_secret_str("s3cret"))
}

fn resolver_at(now: u64) -> TestResolver {
    let service = RecordService::new(
        InMemoryRecordStore::new(),
        FixedTimeSource::new(now),
        SequentialIdGenerator::default(),
        RegistryConfig::default(),
    );
    let gate = StaticSessionGate::new(FixedTimeSource::new(now)).with_session(
        TOKEN,
        Session::new(ActorId::new("staff-01"), u64::MAX),
    );
    RecordResolver::new(service, codec(), gate)
}

fn farm(premise_code: &str) -> FarmRecord {
    FarmRecord {
        premise_code: premise_code.to_string(),
        name: "Ladang Satu".to_string(),
        district: "Kuantan".to_string(),
        state: "Pahang".to_string(),
        holder_name: "Aminah".to_string(),
    }
}

fn sealed_create(premise_code: &str) -> String {
    Signed::seal(
        &CreateRequest {
            token: SessionToken::new(TOKEN),
            record: farm(premise_code),
        },
        &codec(),
    )
    .unwrap()
}

#[test]
fn test_create_returns_success_receipt() {
    let mut resolver = resolver_at(1_000);

    let receipt = resolver
        .create::<FarmRecord>(&sealed_create("PK-001"))
        .unwrap();

    assert_eq!(receipt.status, "success");
    assert_eq!(receipt.sequence_code, "FM-000001");
    assert_eq!(resolver.service().count::<FarmRecord>().unwrap(), 1);
}

#[test]
fn test_unknown_token_aborts_before_persistence() {
    let mut resolver = resolver_at(1_000);

    let envelope = Signed::seal(
        &CreateRequest {
            token: SessionToken::new("tok-forged"),
            record: farm("PK-001"),
        },
        &codec(),
    )
    .unwrap();

    let result = resolver.create::<FarmRecord>(&envelope);
    assert_eq!(
        result,
        Err(RegistryError::Auth(SessionError::UnknownToken))
    );

    assert_eq!(resolver.service().count::<FarmRecord>().unwrap(), 0);
    assert!(resolver
        .service()
        .activity_for("farms")
        .unwrap()
        .is_empty());
}

#[test]
fn test_tampered_envelope_aborts_before_decode() {
    let mut resolver = resolver_at(1_000);

    let envelope = sealed_create("PK-001");
    let mut tampered = envelope.clone();
    let last = tampered.pop().unwrap();
    tampered.push(if last == '0' { '1' } else { '0' });

    let result = resolver.create::<FarmRecord>(&tampered);
    assert_eq!(
        result,
        Err(RegistryError::Envelope(EnvelopeError::IntegrityFailure))
    );
    assert_eq!(resolver.service().count::<FarmRecord>().unwrap(), 0);
}

#[test]
fn test_envelope_signed_with_other_secret_rejected() {
    let mut resolver = resolver_at(1_000);

    let other = PayloadCodec::new(CodecConfig::from_secret_str("wrong"));
    let envelope = Signed::seal(
        &CreateRequest {
            token: SessionToken::new(TOKEN),
            record: farm("PK-001"),
        },
        &other,
    )
    .unwrap();

    let result = resolver.create::<FarmRecord>(&envelope);
    assert_eq!(
        result,
        Err(RegistryError::Envelope(EnvelopeError::IntegrityFailure))
    );
}

#[test]
fn test_update_strips_embedded_server_columns() {
    let mut resolver = resolver_at(1_000);
    let receipt = resolver
        .create::<FarmRecord>(&sealed_create("PK-001"))
        .unwrap();

    resolver.service_mut().time.set(2_000);

    // A stale client re-submits a prior read wholesale: record fields plus
    // identifier, timestamps, and soft-delete markers.
    let mut record = Map::new();
    record.insert("premiseCode".to_string(), json!("PK-001"));
    record.insert("name".to_string(), json!("Ladang Baru"));
    record.insert("district".to_string(), json!("Kuantan"));
    record.insert("state".to_string(), json!("Pahang"));
    record.insert("holderName".to_string(), json!("Aminah"));
    record.insert("uuid".to_string(), json!(Uuid::from_u128(77).to_string()));
    record.insert("updatedAt".to_string(), json!(999));
    record.insert("createdAt".to_string(), json!(1));
    record.insert("deletedAt".to_string(), json!(5));

    let mut payload = Map::new();
    payload.insert("token".to_string(), json!(TOKEN));
    payload.insert("uuid".to_string(), json!(receipt.uuid.to_string()));
    payload.insert("record".to_string(), Value::Object(record));
    let envelope = codec().encode(&payload).unwrap();

    resolver.update::<FarmRecord>(&envelope).unwrap();

    let stored = resolver
        .service()
        .fetch_any::<FarmRecord>(receipt.uuid)
        .unwrap();
    // Server columns are server truth, not the client's stale copy.
    assert_eq!(stored.columns.uuid, receipt.uuid);
    assert_eq!(stored.columns.created_at, 1_000);
    assert_eq!(stored.columns.updated_at, 2_000);
    assert!(stored.columns.deleted_at.is_none());
    assert_eq!(stored.fields.name, "Ladang Baru");
}

#[test]
fn test_list_seals_query_result() {
    let mut resolver = resolver_at(1_000);
    resolver
        .create::<FarmRecord>(&sealed_create("PK-001"))
        .unwrap();
    resolver
        .create::<FarmRecord>(&sealed_create("PK-002"))
        .unwrap();

    let request = Signed::seal(
        &ListRequest {
            token: SessionToken::new(TOKEN),
            limit: None,
        },
        &codec(),
    )
    .unwrap();

    let sealed = resolver.list::<FarmRecord>(&request).unwrap();

    // The response is itself an envelope the caller must open.
    let opened: Signed<QueryResult<FarmRecord>> = Signed::open(&sealed, &codec()).unwrap();
    assert_eq!(opened.payload.query_result.len(), 2);
    assert_eq!(
        opened.payload.query_result[0].record.premise_code,
        "PK-002"
    );
}

#[test]
fn test_delete_then_list_excludes_record() {
    let mut resolver = resolver_at(1_000);
    let receipt = resolver
        .create::<FarmRecord>(&sealed_create("PK-001"))
        .unwrap();

    let delete = Signed::seal(
        &DeleteRequest {
            token: SessionToken::new(TOKEN),
            uuid: receipt.uuid,
        },
        &codec(),
    )
    .unwrap();
    let outcome = resolver.delete::<FarmRecord>(&delete).unwrap();
    assert_eq!(outcome.status, "success");

    let request = Signed::seal(
        &ListRequest {
            token: SessionToken::new(TOKEN),
            limit: None,
        },
        &codec(),
    )
    .unwrap();
    let sealed = resolver.list::<FarmRecord>(&request).unwrap();
    let opened: Signed<QueryResult<FarmRecord>> = Signed::open(&sealed, &codec()).unwrap();
    assert!(opened.payload.query_result.is_empty());
}

#[test]
fn test_export_returns_workbook_bytes() {
    let mut resolver = resolver_at(1_000);
    resolver
        .create::<FarmRecord>(&sealed_create("PK-001"))
        .unwrap();

    let request = Signed::seal(
        &super::payloads::ExportRequest {
            token: SessionToken::new(TOKEN),
        },
        &codec(),
    )
    .unwrap();

    let bytes = resolver
        .export::<FarmRecord>(&request, &CsvWorkbookRenderer::new())
        .unwrap();
    let text = String::from_utf8(bytes).unwrap();
    assert!(text.contains("PK-001"));
}

#[test]
fn test_update_payload_for_wrong_shape_is_rejected() {
    let mut resolver = resolver_at(1_000);

    // A delete-shaped payload fed to update lacks the record field.
    let envelope = Signed::seal(
        &DeleteRequest {
            token: SessionToken::new(TOKEN),
            uuid: Uuid::from_u128(1),
        },
        &codec(),
    )
    .unwrap();

    let result = resolver.update::<FarmRecord>(&envelope);
    assert!(matches!(
        result,
        Err(RegistryError::Envelope(EnvelopeError::Serialization { .. }))
    ));
}
