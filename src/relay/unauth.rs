//! Unauthenticated catalog calls, signed with consumer credentials only.

// self
use crate::{
	_prelude::*,
	http::{HttpResponse, Method, Transport},
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
	query::QuerySet,
	relay::{Relay, handshake::outcome_of},
	request::{RequestContext, apply_oauth_parameters},
	sign,
};

impl<C> Relay<C>
where
	C: ?Sized + Transport,
{
	/// Signs and sends a consumer-only GET against `path`.
	///
	/// No token state is involved, so nothing is read from or written to the
	/// store. The response body is returned unparsed.
	pub async fn send_unauthenticated(
		&self,
		path: &str,
		query: QuerySet,
	) -> Result<HttpResponse> {
		let span = FlowSpan::new(FlowKind::Catalog, "send_unauthenticated");

		obs::record_flow_outcome(FlowKind::Catalog, FlowOutcome::Attempt);

		let result = span
			.instrument(async {
				let credentials = self.credentials.get().map_err(Error::from)?;
				let mut query = query;

				apply_oauth_parameters(&mut query, &credentials.key);

				let key = sign::signing_key(credentials.secret.expose(), None);
				let signed = RequestContext::new(path, Method::Get)
					.with_query(query)
					.sign(&self.descriptor, &key);

				self.transport.get(&signed.url).await.map_err(Error::from)
			})
			.await;

		obs::record_flow_outcome(FlowKind::Catalog, outcome_of(&result));

		result
	}
}
