use logos::Logos;

/// Raw tokens produced by logos when scanning a source body for statements
/// that may call an action.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
enum RawToken {
	#[token(":=")]
	Assign,
	#[token(";")]
	Semicolon,
	#[regex(r"[ \t\r\n\x0C]+")]
	Whitespace,
	#[regex(r"[A-Za-z0-9_]+")]
	Ident,
}

/// Collect the identifiers of a source body that look like a bare call
/// statement: whitespace, an identifier, then `;`.
///
/// Identifiers on the right-hand side of an assignment (`x := y;`) are not
/// candidates. Every other character breaks a candidate sequence.
pub(crate) fn call_candidates(code: &str) -> Vec<&str> {
	let tokens: Vec<(Option<RawToken>, std::ops::Range<usize>)> = RawToken::lexer(code)
		.spanned()
		.map(|(token, span)| (token.ok(), span))
		.collect();
	let mut candidates = Vec::new();

	for (index, window) in tokens.windows(3).enumerate() {
		let [
			(Some(RawToken::Whitespace), _),
			(Some(RawToken::Ident), name),
			(Some(RawToken::Semicolon), _),
		] = window
		else {
			continue;
		};

		let after_assignment = index
			.checked_sub(1)
			.is_some_and(|previous| tokens[previous].0 == Some(RawToken::Assign));
		if after_assignment {
			continue;
		}

		candidates.push(&code[name.clone()]);
	}

	candidates
}
