//! Optional observability helpers for authority flows.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `oauth2_authority.flow` with the `flow`
//!   and `stage` (call site) fields. Failures are logged at `warn`; token rejections that are
//!   folded into an inactive result are logged at `debug`.
//! - Enable `metrics` to increment the `oauth2_authority_flow_total` counter for every
//!   attempt/success/failure, labeled by `flow` + `outcome`.

mod tracing;

pub use tracing::*;

// self
use crate::_prelude::*;

/// Flow kinds observed by the authority.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowKind {
	/// Password grant issuance.
	PasswordGrant,
	/// Token introspection.
	Introspection,
	/// Bearer strategy resolution.
	Bearer,
	/// Basic strategy resolution.
	Basic,
	/// Logout / revocation.
	Revocation,
	/// Login redirect flow.
	Login,
	/// Profile lookup.
	Profile,
}
impl FlowKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowKind::PasswordGrant => "password_grant",
			FlowKind::Introspection => "introspection",
			FlowKind::Bearer => "bearer",
			FlowKind::Basic => "basic",
			FlowKind::Revocation => "revocation",
			FlowKind::Login => "login",
			FlowKind::Profile => "profile",
		}
	}
}
impl Display for FlowKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowOutcome {
	/// Entry to an authority helper.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl FlowOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowOutcome::Attempt => "attempt",
			FlowOutcome::Success => "success",
			FlowOutcome::Failure => "failure",
		}
	}
}
impl Display for FlowOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Bumps `oauth2_authority_flow_total{flow, outcome}` when the `metrics` feature is on.
pub fn record_flow_outcome(kind: FlowKind, outcome: FlowOutcome) {
	#[cfg(feature = "metrics")]
	metrics::counter!(
		"oauth2_authority_flow_total",
		"flow" => kind.as_str(),
		"outcome" => outcome.as_str()
	)
	.increment(1);
	#[cfg(not(feature = "metrics"))]
	let _ = (kind, outcome);
}

/// Runs `fut` inside a flow span, recording attempt and outcome and logging failures.
pub(crate) async fn observe<T, Fut>(kind: FlowKind, stage: &'static str, fut: Fut) -> Result<T>
where
	Fut: Future<Output = Result<T>>,
{
	let span = FlowSpan::new(kind, stage);

	record_flow_outcome(kind, FlowOutcome::Attempt);

	let result = span.instrument(fut).await;

	match &result {
		Ok(_) => record_flow_outcome(kind, FlowOutcome::Success),
		Err(e) => {
			log_flow_failure(kind, stage, e);
			record_flow_outcome(kind, FlowOutcome::Failure);
		},
	}

	result
}
