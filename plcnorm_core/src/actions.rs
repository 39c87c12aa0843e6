use std::collections::BTreeMap;
use std::collections::HashSet;

use crate::Action;
use crate::PlcnormError;
use crate::PlcnormResult;
use crate::lexer::call_candidates;

/// Resolve the actions reachable from a unit's main body.
///
/// The result starts with `seed` (lifecycle actions such as `Init` and
/// `Exit`). Every call candidate in `main_code` appends each `known` action of
/// that name, then every action of the sequence, seed included, is scanned the
/// same way in order and its discoveries are appended to the end. An action
/// called twice therefore appears twice.
///
/// Calls that form a cycle are reported as [`PlcnormError::CyclicActionCall`]
/// before any expansion happens.
pub fn resolve_actions(
	main_code: &str,
	seed: &[Action],
	known: &[Action],
) -> PlcnormResult<Vec<Action>> {
	if known.is_empty() {
		return Ok(seed.to_vec());
	}

	let graph = CallGraph::new(known);
	let roots: Vec<&str> = std::iter::once(main_code)
		.chain(seed.iter().map(|action| action.code.as_str()))
		.flat_map(call_candidates)
		.collect();
	graph.check_acyclic(&roots)?;

	let mut sequence = seed.to_vec();
	append_called(&mut sequence, main_code, known);

	let mut cursor = 0;
	while cursor < sequence.len() {
		let code = sequence[cursor].code.clone();
		append_called(&mut sequence, &code, known);
		cursor += 1;
	}

	tracing::trace!(count = sequence.len(), "resolved actions");
	Ok(sequence)
}

fn append_called(sequence: &mut Vec<Action>, code: &str, known: &[Action]) {
	for candidate in call_candidates(code) {
		sequence.extend(
			known
				.iter()
				.filter(|action| action.name == candidate)
				.cloned(),
		);
	}
}

/// Action names mapped to the known actions they call.
struct CallGraph<'a> {
	edges: BTreeMap<&'a str, Vec<&'a str>>,
}

impl<'a> CallGraph<'a> {
	fn new(known: &'a [Action]) -> Self {
		let mut edges: BTreeMap<&'a str, Vec<&'a str>> = BTreeMap::new();
		for action in known {
			edges.entry(action.name.as_str()).or_default();
		}

		for action in known {
			let callees: Vec<&'a str> = call_candidates(&action.code)
				.into_iter()
				.filter(|candidate| edges.contains_key(candidate))
				.collect();
			if let Some(targets) = edges.get_mut(action.name.as_str()) {
				targets.extend(callees);
			}
		}

		Self { edges }
	}

	fn check_acyclic(&self, roots: &[&str]) -> PlcnormResult<()> {
		let mut finished = HashSet::new();
		let mut path = Vec::new();

		for root in roots {
			if let Some((name, _)) = self.edges.get_key_value(*root) {
				self.visit(*name, &mut path, &mut finished)?;
			}
		}

		Ok(())
	}

	fn visit(
		&self,
		name: &'a str,
		path: &mut Vec<&'a str>,
		finished: &mut HashSet<&'a str>,
	) -> PlcnormResult<()> {
		if finished.contains(name) {
			return Ok(());
		}

		if let Some(start) = path.iter().position(|entry| *entry == name) {
			let mut chain: Vec<String> = path[start..].iter().map(ToString::to_string).collect();
			chain.push(name.to_string());
			return Err(PlcnormError::CyclicActionCall { chain });
		}

		path.push(name);
		for callee in self.edges.get(name).into_iter().flatten() {
			self.visit(*callee, path, finished)?;
		}
		path.pop();
		finished.insert(name);

		Ok(())
	}
}
