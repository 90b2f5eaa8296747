//! The single "current result" slot and the fence that keeps stale
//! responses out of it.

use crate::calculations::{DerivedMetrics, derive_metrics};
use crate::models::{CalculationRequest, CalculationResult};

/// The most recent (request, result) pair plus its derived figures.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentResult {
    pub request: CalculationRequest,
    pub result: CalculationResult,
    pub metrics: DerivedMetrics,
}

impl CurrentResult {
    pub fn new(request: CalculationRequest, result: CalculationResult) -> Self {
        let metrics = derive_metrics(&request, &result);
        Self {
            request,
            result,
            metrics,
        }
    }
}

/// Issued when a calculation starts; compared on completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestTicket(u64);

impl RequestTicket {
    pub fn value(self) -> u64 {
        self.0
    }
}

/// Owned by the workflow. Empty at startup and never persisted.
#[derive(Debug, Default)]
pub struct Session {
    current: Option<CurrentResult>,
    latest: u64,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&CurrentResult> {
        self.current.as_ref()
    }

    /// Starts a calculation. Any ticket issued earlier becomes stale.
    pub fn begin(&mut self) -> RequestTicket {
        self.latest += 1;
        RequestTicket(self.latest)
    }

    pub fn is_latest(&self, ticket: RequestTicket) -> bool {
        ticket.0 == self.latest
    }

    /// Applies a finished calculation if `ticket` is still the latest one.
    ///
    /// Returns `None` and leaves the slot untouched for a stale ticket.
    pub fn complete(
        &mut self,
        ticket: RequestTicket,
        request: CalculationRequest,
        result: CalculationResult,
    ) -> Option<&CurrentResult> {
        if !self.is_latest(ticket) {
            tracing::debug!(
                ticket = ticket.0,
                latest = self.latest,
                "discarding stale calculation response"
            );
            return None;
        }
        Some(&*self.current.insert(CurrentResult::new(request, result)))
    }

    /// Replaces the slot with a reloaded pair. Responses still in flight
    /// become stale.
    pub fn reload(
        &mut self,
        request: CalculationRequest,
        result: CalculationResult,
    ) -> &CurrentResult {
        self.latest += 1;
        self.current.insert(CurrentResult::new(request, result))
    }
}
