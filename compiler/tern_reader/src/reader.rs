//! The reader state machine.
//!
//! One pass over the characters, no lookahead beyond the peeked character.
//! The reader is in one of three modes (normal, in a string, in a comment),
//! may additionally be inside a `|...|` region or right after a `\`, and
//! keeps a stack of open lists plus the text of the token being read.
//!
//! Characters that end a token (whitespace, `(`, `)`, `;`) flush it
//! before they are consumed, so when the expression limit is reached the
//! delimiter is still in the stream.

use std::iter::Peekable;
use std::mem;

use tern_ir::{Literal, NodeId, ParseTree, Position, Problem, ProblemKind, Span, TreeBuilder};

use crate::classify::{classify, Atom};
use crate::{ReaderConfig, SourceContext};

/// Head symbol of the list an `f"name"` token expands to.
pub const FUNCTION_MARKER: &str = "FUNCTION";

/// Read up to `max` top-level expressions from `chars`.
///
/// Characters after the last expression read are left in `chars`.
pub fn parse<I: Iterator<Item = char>>(
    ctx: &SourceContext,
    chars: &mut Peekable<I>,
    max: Option<usize>,
) -> ParseTree {
    parse_with_config(ctx, chars, &ReaderConfig::new().with_max_expressions(max))
}

/// Read `chars` with explicit options.
#[tracing::instrument(level = "debug", skip_all, fields(source = %ctx.name()))]
pub fn parse_with_config<I: Iterator<Item = char>>(
    ctx: &SourceContext,
    chars: &mut Peekable<I>,
    config: &ReaderConfig,
) -> ParseTree {
    let tree = Reader::new(ctx, config).run(chars);
    tracing::debug!(
        expressions = tree.expression_count(),
        nodes = tree.len(),
        exhausted = tree.is_exhausted(),
        "read complete"
    );
    tree
}

/// Read all of `text`.
pub fn parse_str(ctx: &SourceContext, text: &str) -> ParseTree {
    parse(ctx, &mut text.chars().peekable(), None)
}

/// Read at most `max` top-level expressions from `text`.
pub fn parse_str_limited(ctx: &SourceContext, text: &str, max: usize) -> ParseTree {
    parse(ctx, &mut text.chars().peekable(), Some(max))
}

struct Reader<'c> {
    config: &'c ReaderConfig,
    builder: TreeBuilder,
    root: NodeId,
    /// Position of the next character.
    pos: Position,
    /// Open lists, innermost last.
    frames: Vec<NodeId>,
    token: String,
    token_start: Position,
    comment: String,
    comment_start: Position,
    in_string: bool,
    in_comment: bool,
    in_pipe: bool,
    escaping: bool,
    expressions: usize,
}

impl<'c> Reader<'c> {
    fn new(ctx: &SourceContext, config: &'c ReaderConfig) -> Self {
        let start = ctx.position();
        let mut builder = TreeBuilder::new(ctx.name_handle().clone());
        let root = builder.open_list(start);
        Reader {
            config,
            builder,
            root,
            pos: start,
            frames: Vec::new(),
            token: String::new(),
            token_start: start,
            comment: String::new(),
            comment_start: start,
            in_string: false,
            in_comment: false,
            in_pipe: false,
            escaping: false,
            expressions: 0,
        }
    }

    fn run<I: Iterator<Item = char>>(mut self, chars: &mut Peekable<I>) -> ParseTree {
        loop {
            if self.limit_reached() {
                return self.finish(false);
            }
            let Some(&c) = chars.peek() else {
                break;
            };
            if self.ends_token(c) {
                self.flush();
                if self.limit_reached() {
                    return self.finish(false);
                }
            }
            chars.next();
            self.step(c);
            self.pos.advance(c);
        }
        self.end_of_input();
        self.finish(true)
    }

    fn limit_reached(&self) -> bool {
        self.config
            .max_expressions
            .is_some_and(|max| self.expressions >= max)
    }

    /// Check if `c`, read in the current state, terminates the pending token.
    fn ends_token(&self, c: char) -> bool {
        !(self.in_string || self.in_comment || self.in_pipe || self.escaping)
            && (c.is_whitespace() || matches!(c, '(' | ')' | ';'))
    }

    /// Innermost open list, or the root.
    fn current(&self) -> NodeId {
        self.frames.last().copied().unwrap_or(self.root)
    }

    fn step(&mut self, c: char) {
        if self.in_comment {
            if c == '\n' {
                self.end_comment();
            } else if self.config.keep_comments {
                self.comment.push(c);
            }
            return;
        }

        if self.in_string {
            self.push(c);
            if self.escaping {
                self.escaping = false;
            } else if c == '\\' {
                self.escaping = true;
            } else if c == '"' {
                self.in_string = false;
            }
            return;
        }

        if self.escaping {
            self.push(c);
            self.escaping = false;
            return;
        }

        match c {
            '\\' => {
                self.push(c);
                self.escaping = true;
            }
            '|' => {
                self.push(c);
                self.in_pipe = !self.in_pipe;
            }
            _ if self.in_pipe => self.push(c),
            '"' => {
                self.push(c);
                self.in_string = true;
            }
            '(' => {
                let list = self.builder.open_list(self.pos);
                self.builder.attach(self.current(), list);
                self.frames.push(list);
            }
            ')' => self.close_list(),
            ';' => {
                self.in_comment = true;
                self.comment_start = self.pos;
                if self.config.keep_comments {
                    self.comment.push(c);
                }
            }
            _ if c.is_whitespace() => {}
            _ => self.push(c),
        }
    }

    fn push(&mut self, c: char) {
        if self.token.is_empty() {
            self.token_start = self.pos;
        }
        self.token.push(c);
    }

    fn close_list(&mut self) {
        if let Some(list) = self.frames.pop() {
            self.builder.close(list, self.pos.offset + 1);
            if self.frames.is_empty() {
                self.expressions += 1;
            }
            return;
        }

        let span = Span::new(self.pos, 1);
        tracing::debug!(at = %span, "too many right parentheses");
        let leaf = self.builder.leaf(None, span);
        self.builder
            .set_problem(leaf, Problem::new(ProblemKind::TooManyRightParens, span));
        self.builder.attach(self.root, leaf);
    }

    fn end_comment(&mut self) {
        self.in_comment = false;
        if !self.config.keep_comments {
            return;
        }
        let text = mem::take(&mut self.comment);
        let span = Span::until(self.comment_start, self.pos.offset);
        let leaf = self.builder.leaf(Some(Literal::Str(text)), span);
        self.builder.mark_comment(leaf);
        self.builder.attach(self.current(), leaf);
    }

    /// Turn the pending token into a node of the current list.
    fn flush(&mut self) {
        if self.token.is_empty() {
            return;
        }
        let text = mem::take(&mut self.token);
        let span = Span::until(self.token_start, self.pos.offset);
        tracing::trace!(token = %text, at = %span, "atom");

        let node = match classify(&text) {
            Ok(Atom::Literal(literal)) => self.builder.leaf(Some(literal), span),
            Ok(Atom::FunctionRef(name)) => {
                let list = self.builder.open_list(span.start);
                let head = self
                    .builder
                    .leaf(Some(Literal::Symbol(FUNCTION_MARKER.to_string())), span);
                let target = self.builder.leaf(Some(Literal::Symbol(name)), span);
                self.builder.attach(list, head);
                self.builder.attach(list, target);
                self.builder.close(list, span.end());
                list
            }
            Err(e) => {
                tracing::debug!(token = %text, at = %span, error = %e, "invalid atom");
                let leaf = self.builder.leaf(None, span);
                self.builder.set_problem(
                    leaf,
                    Problem::new(
                        ProblemKind::InvalidAtom {
                            token: text,
                            message: e.to_string(),
                        },
                        span,
                    ),
                );
                leaf
            }
        };
        self.builder.attach(self.current(), node);
        if self.frames.is_empty() {
            self.expressions += 1;
        }
    }

    fn end_of_input(&mut self) {
        let end = self.pos.offset;

        if self.in_comment {
            self.end_comment();
        }

        if self.in_string {
            let span = Span::until(self.token_start, end);
            tracing::debug!(at = %span, "unclosed string");
            self.token.clear();
            self.in_string = false;
            self.builder
                .set_problem(self.root, Problem::new(ProblemKind::UnclosedString, span));
        } else if self.in_pipe {
            let span = Span::until(self.token_start, end);
            tracing::debug!(at = %span, "unterminated atom");
            self.token.clear();
            self.in_pipe = false;
            let leaf = self.builder.leaf(None, span);
            self.builder
                .set_problem(leaf, Problem::new(ProblemKind::UnterminatedAtom, span));
            self.builder.attach(self.current(), leaf);
        } else {
            self.flush();
        }
        self.escaping = false;

        while let Some(list) = self.frames.pop() {
            let start = self.builder.node(list).span.start;
            tracing::debug!(at = %start, "unbalanced open parenthesis");
            self.builder.close(list, end);
            self.builder.set_problem(
                list,
                Problem::new(ProblemKind::UnbalancedOpenParen, Span::new(start, 1)),
            );
        }
    }

    fn finish(mut self, exhausted: bool) -> ParseTree {
        self.builder.close(self.root, self.pos.offset);
        self.builder
            .finish(self.root, self.pos, self.expressions, exhausted)
    }
}

#[cfg(test)]
mod tests;
