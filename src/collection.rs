use crate::rewrite::Route;

/// Append-only collection the host keeps matched routes in.
///
/// Compiled artifacts attach one route per record, in document order;
/// duplicate or conflicting routes are kept verbatim for the host to
/// reconcile.
#[derive(Default)]
pub struct RouteCollection {
	routes: Vec<Box<dyn Route>>,
}

impl RouteCollection {
	pub fn new() -> RouteCollection {
		RouteCollection::default()
	}

	/// Attach a route. Routes are never removed or reordered.
	pub fn attach(&mut self, route: impl Route + 'static) {
		self.routes.push(Box::new(route));
	}

	pub fn iter(&self) -> impl Iterator<Item = &dyn Route> {
		self.routes.iter().map(Box::as_ref)
	}

	pub fn len(&self) -> usize {
		self.routes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.routes.is_empty()
	}
}

impl std::fmt::Debug for RouteCollection {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("RouteCollection")
			.field("len", &self.routes.len())
			.finish()
	}
}
