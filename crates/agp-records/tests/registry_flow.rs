//! End-to-end registry flow over the durable store: tokenized requests in,
//! receipts and sealed results out, state surviving a restart.

use agp_envelope::{CodecConfig, PayloadCodec, Signed};
use agp_records::resolver::payloads::{
    CreateRequest, DeleteRequest, ListRequest, UpdateRequest,
};
use agp_records::{
    CropRecord, FarmRecord, QueryResult, RecordRegistryApi, RecordResolver, RecordService,
    RegistryConfig, StaticSessionGate,
};
use agp_records::{FileBackedRecordStore, SystemTimeSource, UuidGenerator};
use shared_types::{ActorId, Session, SessionToken};

const TOKEN: &str = "tok-operator";

type FlowResolver = RecordResolver<
    FileBackedRecordStore,
    SystemTimeSource,
    UuidGenerator,
    StaticSessionGate<SystemTimeSource>,
>;

fn codec() -> PayloadCodec {
    PayloadCodec::new(CodecConfig::from_secret_str("integration-secret"))
}

fn resolver(path: &std::path::Path) -> FlowResolver {
    let store = FileBackedRecordStore::open(path).unwrap();
    let service = RecordService::new(
        store,
        SystemTimeSource,
        UuidGenerator,
        RegistryConfig::default(),
    );
    let gate = StaticSessionGate::new(SystemTimeSource).with_session(
        TOKEN,
        Session::new(ActorId::new("district-office"), u64::MAX),
    );
    RecordResolver::new(service, codec(), gate)
}

fn farm(premise_code: &str, name: &str) -> FarmRecord {
    FarmRecord {
        premise_code: premise_code.to_string(),
        name: name.to_string(),
        district: "Kuantan".to_string(),
        state: "Pahang".to_string(),
        holder_name: "Aminah".to_string(),
    }
}

fn seal<T: serde::Serialize>(payload: &T) -> String {
    Signed::seal(payload, &codec()).unwrap()
}

#[test]
fn full_lifecycle_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("records.json");

    let farm_uuid;
    {
        let mut resolver = resolver(&path);

        // Create two farms and a crop under the first.
        let first = resolver
            .create::<FarmRecord>(&seal(&CreateRequest {
                token: SessionToken::new(TOKEN),
                record: farm("PK-001", "Ladang Satu"),
            }))
            .unwrap();
        farm_uuid = first.uuid;

        resolver
            .create::<FarmRecord>(&seal(&CreateRequest {
                token: SessionToken::new(TOKEN),
                record: farm("PK-002", "Ladang Dua"),
            }))
            .unwrap();

        resolver
            .create::<CropRecord>(&seal(&CreateRequest {
                token: SessionToken::new(TOKEN),
                record: CropRecord {
                    farm_uuid: Some(farm_uuid),
                    crop_type: "Padi".to_string(),
                    variety: "MR220".to_string(),
                    planted_area_hectares: 2.5,
                    planting_season: "Main".to_string(),
                },
            }))
            .unwrap();

        // Rename the first farm.
        resolver
            .update::<FarmRecord>(&seal(&UpdateRequest {
                token: SessionToken::new(TOKEN),
                uuid: farm_uuid,
                record: farm("PK-001", "Ladang Utama"),
            }))
            .unwrap();
    }

    // Fresh process over the same file.
    let mut resolver = resolver(&path);

    let sealed = resolver
        .list::<FarmRecord>(&seal(&ListRequest {
            token: SessionToken::new(TOKEN),
            limit: None,
        }))
        .unwrap();
    let farms: Signed<QueryResult<FarmRecord>> = Signed::open(&sealed, &codec()).unwrap();
    assert_eq!(farms.payload.query_result.len(), 2);
    assert!(farms
        .payload
        .query_result
        .iter()
        .any(|r| r.record.name == "Ladang Utama"));

    // Sequence numbering resumes after restart.
    let third = resolver
        .create::<FarmRecord>(&seal(&CreateRequest {
            token: SessionToken::new(TOKEN),
            record: farm("PK-003", "Ladang Tiga"),
        }))
        .unwrap();
    assert_eq!(third.sequence_code, "FM-000003");

    // Soft delete excludes from lists but keeps the row and its audit trail.
    resolver
        .delete::<FarmRecord>(&seal(&DeleteRequest {
            token: SessionToken::new(TOKEN),
            uuid: farm_uuid,
        }))
        .unwrap();

    let sealed = resolver
        .list::<FarmRecord>(&seal(&ListRequest {
            token: SessionToken::new(TOKEN),
            limit: None,
        }))
        .unwrap();
    let farms: Signed<QueryResult<FarmRecord>> = Signed::open(&sealed, &codec()).unwrap();
    assert_eq!(farms.payload.query_result.len(), 2);
    assert!(!farms
        .payload
        .query_result
        .iter()
        .any(|r| r.uuid == farm_uuid));

    let kept = resolver.service().fetch_any::<FarmRecord>(farm_uuid).unwrap();
    assert!(kept.columns.deleted_at.is_some());

    // created + created + updated + deleted for farms, plus the third create.
    let activity = resolver.service().activity_for("farms").unwrap();
    assert_eq!(activity.len(), 5);
}
