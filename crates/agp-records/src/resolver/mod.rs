//! # Resolver Shell
//!
//! The envelope-facing wrapper around the registry service. Every operation
//! follows the same sequence: open the envelope, validate the session, run
//! the registry logic, return a receipt (mutations) or a sealed query
//! result (bulk reads).
//!
//! Session and envelope failures abort before any side effect; validation
//! failures abort before persistence. There is nothing to roll back at any
//! abort point because the record write and its audit entry only ever
//! travel in one atomic commit below this layer.

pub mod payloads;
#[cfg(test)]
mod tests;

use agp_envelope::{PayloadCodec, Signed};
use shared_types::Session;

use crate::domain::entities::RecordFields;
use crate::domain::errors::RegistryError;
use crate::ports::inbound::RecordRegistryApi;
use crate::ports::outbound::{
    IdGenerator, RecordStore, SessionGate, TimeSource, WorkbookRenderer,
};
use crate::service::RecordService;

use payloads::{
    CreateRequest, DeleteRequest, ExportRequest, ListRequest, MutationReceipt, QueryResult,
    RecordView, UpdateRequest,
};

/// The per-operation shell applying the transport convention.
pub struct RecordResolver<ST, TS, ID, SG>
where
    ST: RecordStore,
    TS: TimeSource,
    ID: IdGenerator,
    SG: SessionGate,
{
    service: RecordService<ST, TS, ID>,
    codec: PayloadCodec,
    gate: SG,
}

impl<ST, TS, ID, SG> RecordResolver<ST, TS, ID, SG>
where
    ST: RecordStore,
    TS: TimeSource,
    ID: IdGenerator,
    SG: SessionGate,
{
    pub fn new(service: RecordService<ST, TS, ID>, codec: PayloadCodec, gate: SG) -> Self {
        Self {
            service,
            codec,
            gate,
        }
    }

    /// Get reference to the underlying service.
    pub fn service(&self) -> &RecordService<ST, TS, ID> {
        &self.service
    }

    /// Get mutable reference to the underlying service.
    pub fn service_mut(&mut self) -> &mut RecordService<ST, TS, ID> {
        &mut self.service
    }

    /// Open an envelope and validate the session it carries, in that order.
    fn open_session<P, T>(
        &self,
        tokenized: &str,
        token_of: T,
    ) -> Result<(P, Session), RegistryError>
    where
        P: serde::de::DeserializeOwned,
        T: Fn(&P) -> &shared_types::SessionToken,
    {
        let opened: Signed<P> = Signed::open(tokenized, &self.codec)?;
        let payload = opened.payload;
        let session = self.gate.assert_valid(token_of(&payload))?;
        Ok((payload, session))
    }

    /// Create a record from a tokenized payload.
    pub fn create<F: RecordFields>(
        &mut self,
        tokenized: &str,
    ) -> Result<MutationReceipt, RegistryError> {
        // Step 1: Open envelope, validate session
        let (request, session) =
            self.open_session::<CreateRequest<F>, _>(tokenized, |r| &r.token)?;

        // Step 2: Relations, generated fields, atomic persist + audit
        let columns = self.service.create(&session.actor, request.record)?;

        // Step 3: Receipt
        Ok(MutationReceipt::success(&columns))
    }

    /// Update a record; the identifier rides inside the payload.
    pub fn update<F: RecordFields>(
        &mut self,
        tokenized: &str,
    ) -> Result<MutationReceipt, RegistryError> {
        // Step 1: Open envelope (typed decode drops any server-managed
        // fields a stale client embedded), validate session
        let (request, session) =
            self.open_session::<UpdateRequest<F>, _>(tokenized, |r| &r.token)?;

        // Step 2: Persist by identifier + audit
        let columns = self
            .service
            .update(&session.actor, request.uuid, request.record)?;

        Ok(MutationReceipt::success(&columns))
    }

    /// Soft-delete a record.
    pub fn delete<F: RecordFields>(
        &mut self,
        tokenized: &str,
    ) -> Result<MutationReceipt, RegistryError> {
        // Step 1: Open envelope, validate session
        let (request, session) = self.open_session::<DeleteRequest, _>(tokenized, |r| &r.token)?;

        // Step 2: Snapshot, mark deleted, persist + audit
        let columns = self
            .service
            .soft_delete::<F>(&session.actor, request.uuid)?;

        Ok(MutationReceipt::success(&columns))
    }

    /// List live records, sealed as `{ "queryResult": [...] }`.
    pub fn list<F: RecordFields>(&self, tokenized: &str) -> Result<String, RegistryError> {
        // Step 1: Open envelope, validate session
        let (request, _session) = self.open_session::<ListRequest, _>(tokenized, |r| &r.token)?;

        // Step 2: Query live rows
        let records = self.service.list::<F>(request.limit)?;

        // Step 3: Seal the result; decode responsibility is the caller's
        let result = QueryResult {
            query_result: records.into_iter().map(RecordView::from).collect(),
        };
        Ok(Signed::seal(&result, &self.codec)?)
    }

    /// Export live records through the workbook collaborator.
    pub fn export<F: RecordFields>(
        &mut self,
        tokenized: &str,
        renderer: &dyn WorkbookRenderer,
    ) -> Result<Vec<u8>, RegistryError> {
        // Step 1: Open envelope, validate session
        let (_request, session) =
            self.open_session::<ExportRequest, _>(tokenized, |r| &r.token)?;

        // Step 2: Render + audit
        self.service.export_workbook::<F>(&session.actor, renderer)
    }
}
