//! Funding retry
//!
//! A state-changing token call fails when it needs to create a storage box the
//! application cannot pay for. The retry policy repeats such a call once with
//! a payment covering the box's minimum balance.

use std::future::Future;

use arc_primitives::MicroAlgos;

use crate::engine::CallOutcome;
use crate::tx_builder::CallConfig;
use crate::SdkError;

/// Attempts per call, first try included
pub const MAX_ATTEMPTS: usize = 2;

/// Retry-once policy with a fixed funding payment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FundingRetry {
    box_cost: MicroAlgos,
}

impl FundingRetry {
    /// Policy whose second attempt pays `box_cost`
    pub fn new(box_cost: MicroAlgos) -> Self {
        Self { box_cost }
    }

    /// Payment amount of each attempt
    pub fn schedule(&self) -> [MicroAlgos; MAX_ATTEMPTS] {
        [0, self.box_cost]
    }

    /// Run `call` until it succeeds or the schedule is exhausted
    ///
    /// Only execution failures are retried. An argument error or a
    /// propagated `Err` ends the run immediately.
    pub async fn run<F, Fut>(&self, base: &CallConfig, mut call: F) -> Result<CallOutcome, SdkError>
    where
        F: FnMut(CallConfig) -> Fut,
        Fut: Future<Output = Result<CallOutcome, SdkError>>,
    {
        let mut outcome = None;
        for (attempt, amount) in self.schedule().into_iter().enumerate() {
            if attempt > 0 {
                tracing::info!(attempt = attempt + 1, payment = amount, "Retrying with funding payment");
            }
            let result = call(base.with_payment(amount)).await?;
            match &result {
                CallOutcome::Failed(SdkError::ExecutionFailure(message)) => {
                    tracing::warn!(attempt = attempt + 1, error = %message, "Attempt failed");
                }
                _ => return Ok(result),
            }
            outcome = Some(result);
        }
        Ok(outcome.unwrap_or_else(|| {
            CallOutcome::Failed(SdkError::ExecutionFailure("no attempts made".to_string()))
        }))
    }
}
