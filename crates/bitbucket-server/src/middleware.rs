use crate::HttpRequest;
use std::rc::Rc;

/// Transforms a request before it is dispatched.
pub trait RequestMiddleware {
	fn apply(&self, request: &mut HttpRequest);
}

impl<F> RequestMiddleware for F
where
	F: Fn(&mut HttpRequest),
{
	fn apply(&self, request: &mut HttpRequest) {
		(self)(request)
	}
}

/// An ordered list of [`RequestMiddleware`].
///
/// Layers run by ascending priority; layers of equal priority run in the order they were added.
/// A layer is removed by handing back the same `Rc` it was added with.
#[derive(Clone, Default)]
pub struct MiddlewareChain {
	layers: Vec<(i32, Rc<dyn RequestMiddleware>)>,
}

impl MiddlewareChain {
	pub fn add(&mut self, priority: i32, layer: Rc<dyn RequestMiddleware>) {
		let index = self.layers.partition_point(|(existing, _)| *existing <= priority);
		self.layers.insert(index, (priority, layer));
	}

	/// Returns true if the layer was part of the chain.
	pub fn remove(&mut self, layer: &Rc<dyn RequestMiddleware>) -> bool {
		let count = self.layers.len();
		self.layers.retain(|(_, existing)| !Rc::ptr_eq(existing, layer));
		self.layers.len() != count
	}

	pub fn len(&self) -> usize {
		self.layers.len()
	}

	pub fn is_empty(&self) -> bool {
		self.layers.is_empty()
	}

	pub fn apply(&self, mut request: HttpRequest) -> HttpRequest {
		for (_, layer) in &self.layers {
			layer.apply(&mut request);
		}
		request
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use reqwest::header::HeaderValue;

	fn tagging(value: &'static str) -> Rc<dyn RequestMiddleware> {
		Rc::new(move |request: &mut HttpRequest| {
			let trail = match request.headers.get("x-trail") {
				Some(existing) => format!("{},{value}", existing.to_str().unwrap()),
				None => value.to_owned(),
			};
			request.headers.insert("x-trail", HeaderValue::from_str(&trail).unwrap());
		})
	}

	fn trail(chain: &MiddlewareChain) -> Option<String> {
		let request = HttpRequest::get("https://git.example.com/", None).unwrap();
		let request = chain.apply(request);
		request.headers.get("x-trail").map(|value| value.to_str().unwrap().to_owned())
	}

	#[test]
	fn runs_by_priority_then_insertion() {
		let mut chain = MiddlewareChain::default();
		chain.add(15, tagging("late"));
		chain.add(5, tagging("first"));
		chain.add(5, tagging("second"));
		assert_eq!(trail(&chain), Some("first,second,late".to_owned()));
	}

	#[test]
	fn removes_by_reference() {
		let mut chain = MiddlewareChain::default();
		let first = tagging("first");
		let second = tagging("second");
		chain.add(5, first.clone());
		chain.add(5, second.clone());
		assert!(chain.remove(&first));
		assert!(!chain.remove(&first));
		assert_eq!(chain.len(), 1);
		assert_eq!(trail(&chain), Some("second".to_owned()));
		assert!(chain.remove(&second));
		assert!(chain.is_empty());
		assert_eq!(trail(&chain), None);
	}
}
