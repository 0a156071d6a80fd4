//! Java code generation
//!
//! Renders a [`CompilationUnit`] back to source text. Output is
//! deterministic: four-space indentation, one blank line between members and
//! between top-level declarations, `\n` line endings. Verbatim text stored in
//! the tree is re-indented to the depth it is emitted at.

use crate::{
    java_ast::{
        CompilationUnit, Constructor, Expression, FailureHandlingBlock, Member, Modifiers,
        Procedure, Statement, TypeDeclaration, UnitItem,
    },
    parser::text_block_lines,
};

const INDENT: &str = "    ";

/// Render a compilation unit to Java source
pub fn generate(unit: &CompilationUnit) -> String {
    let mut generator = Generator::default();
    generator.unit(unit);
    generator.buffer
}

/// Render a single statement at depth zero, without a trailing newline
pub fn generate_statement(stmt: &Statement) -> String {
    let mut generator = Generator::default();
    generator.statement(stmt);
    let mut rendered = generator.buffer;
    rendered.truncate(rendered.trim_end().len());
    rendered
}

/// Render an expression on a single line
pub fn generate_expression(expr: &Expression) -> String {
    match expr {
        Expression::New {
            type_name,
            arguments,
        } => {
            let arguments: Vec<String> = arguments.iter().map(generate_expression).collect();
            format!("new {type_name}({})", arguments.join(", "))
        }
        Expression::StringLiteral(escaped) => format!("\"{escaped}\""),
        Expression::Name(text) | Expression::Verbatim(text) => text.clone(),
    }
}

fn is_comment_text(text: &str) -> bool {
    text.starts_with("//") || text.starts_with("/*")
}

fn needs_blank_line(previous: &UnitItem, current: &UnitItem) -> bool {
    match (previous, current) {
        (UnitItem::Import(_), UnitItem::Import(_)) => false,
        (UnitItem::Comment(_), _) => false,
        _ => true,
    }
}

/// Append `token` after `separator`, moving it to a new line when the text so
/// far ends in a line comment
fn push_token(text: &mut String, separator: &str, token: &str) {
    if text.lines().last().is_some_and(|line| line.contains("//")) {
        text.push('\n');
    } else {
        text.push_str(separator);
    }
    text.push_str(token);
}

/// Keywords followed by a space, e.g. `public static `
fn keyword_prefix(modifiers: &Modifiers) -> String {
    modifiers
        .keywords
        .iter()
        .map(|keyword| format!("{keyword} "))
        .collect()
}

#[derive(Debug, Default)]
struct Generator {
    buffer: String,
    depth: usize,
}

impl Generator {
    fn line(&mut self, text: &str) {
        if !text.is_empty() {
            for _ in 0..self.depth {
                self.buffer.push_str(INDENT);
            }
            self.buffer.push_str(text);
        }
        self.buffer.push('\n');
    }

    /// Emit possibly multi-line text, indenting every line except text block content
    fn lines(&mut self, text: &str) {
        for (line, raw) in text.lines().zip(text_block_lines(text)) {
            if raw {
                self.buffer.push_str(line);
                self.buffer.push('\n');
            } else {
                self.line(line);
            }
        }
    }

    fn blank(&mut self) {
        self.buffer.push('\n');
    }

    fn unit(&mut self, unit: &CompilationUnit) {
        let mut previous: Option<&UnitItem> = None;
        for item in &unit.items {
            if let Some(previous) = previous
                && needs_blank_line(previous, item)
            {
                self.blank();
            }
            match item {
                UnitItem::Package(text)
                | UnitItem::Import(text)
                | UnitItem::Comment(text)
                | UnitItem::Other(text) => self.lines(text),
                UnitItem::Type(decl) => self.type_declaration(decl),
            }
            previous = Some(item);
        }
    }

    fn annotations(&mut self, modifiers: &Modifiers) {
        for annotation in &modifiers.annotations {
            self.lines(annotation);
        }
    }

    fn type_declaration(&mut self, decl: &TypeDeclaration) {
        if let Some(doc) = &decl.doc {
            self.lines(&doc.content);
        }
        self.annotations(&decl.modifiers);

        let mut header = keyword_prefix(&decl.modifiers);
        header.push_str(&decl.keyword);
        push_token(&mut header, " ", &decl.name);
        if !decl.header.is_empty() {
            let separator = if decl.header.starts_with(['<', '(']) {
                ""
            } else {
                " "
            };
            push_token(&mut header, separator, &decl.header);
        }
        push_token(&mut header, " ", "{");
        self.lines(&header);

        self.depth += 1;
        let mut separate = false;
        if let Some(constants) = &decl.enum_constants {
            separate = self.enum_constants(constants, !decl.members.is_empty());
        }
        for member in &decl.members {
            if separate {
                self.blank();
            }
            self.member(member);
            separate = !matches!(member, Member::Other(text) if is_comment_text(text));
        }
        self.depth -= 1;
        self.line("}");
    }

    /// Emit enum constants, terminated with `;` when members follow.
    /// Returns whether anything was written.
    fn enum_constants(&mut self, constants: &str, has_members: bool) -> bool {
        if constants.is_empty() {
            if has_members {
                self.line(";");
            }
            return has_members;
        }

        let last_line = constants.lines().last().unwrap_or_default();
        if has_members && !last_line.contains("//") {
            self.lines(&format!("{constants};"));
        } else {
            self.lines(constants);
            if has_members {
                self.line(";");
            }
        }
        true
    }

    fn member(&mut self, member: &Member) {
        match member {
            Member::Procedure(procedure) => self.procedure(procedure),
            Member::Constructor(constructor) => self.constructor(constructor),
            Member::Field(text) | Member::NestedType { text, .. } | Member::Other(text) => {
                self.lines(text);
            }
        }
    }

    fn procedure(&mut self, procedure: &Procedure) {
        if let Some(doc) = &procedure.doc {
            self.lines(&doc.content);
        }
        self.annotations(&procedure.modifiers);

        let mut signature = keyword_prefix(&procedure.modifiers);
        if procedure.return_type.is_empty() {
            signature.push_str(&procedure.name);
        } else {
            signature.push_str(&procedure.return_type);
            push_token(&mut signature, " ", &procedure.name);
        }
        signature.push_str(&procedure.parameters);
        signature.push_str(&procedure.dimensions);
        push_throws(&mut signature, &procedure.throws);

        match &procedure.body {
            Some(body) => self.block(&signature, body),
            None => {
                push_token(&mut signature, "", ";");
                self.lines(&signature);
            }
        }
    }

    fn constructor(&mut self, constructor: &Constructor) {
        if let Some(doc) = &constructor.doc {
            self.lines(&doc.content);
        }
        self.annotations(&constructor.modifiers);

        let mut signature = keyword_prefix(&constructor.modifiers);
        if constructor.type_parameters.is_empty() {
            signature.push_str(&constructor.name);
        } else {
            signature.push_str(&constructor.type_parameters);
            push_token(&mut signature, " ", &constructor.name);
        }
        if let Some(parameters) = &constructor.parameters {
            signature.push_str(parameters);
        }
        push_throws(&mut signature, &constructor.throws);

        self.block(&signature, &constructor.body);
    }

    /// `header {`, the statements one level deeper, then `}`
    fn block(&mut self, header: &str, statements: &[Statement]) {
        let mut header = header.to_owned();
        push_token(&mut header, " ", "{");
        self.lines(&header);
        self.statements(statements);
        self.line("}");
    }

    fn statements(&mut self, statements: &[Statement]) {
        self.depth += 1;
        for stmt in statements {
            self.statement(stmt);
        }
        self.depth -= 1;
    }

    fn statement(&mut self, stmt: &Statement) {
        match stmt {
            Statement::Comment(text) | Statement::DelegatingCall(text) | Statement::Verbatim(text) => {
                self.lines(text);
            }
            Statement::Throw(expr) => {
                self.lines(&format!("throw {};", generate_expression(expr)));
            }
            Statement::Try(block) => self.try_statement(block),
        }
    }

    fn try_statement(&mut self, block: &FailureHandlingBlock) {
        self.line("try {");
        self.statements(&block.body);
        for catch in &block.catches {
            self.line(&format!(
                "}} catch ({} {}) {{",
                catch.types.join(" | "),
                catch.variable
            ));
            self.statements(&catch.body);
        }
        if let Some(finally) = &block.finally {
            self.line("} finally {");
            self.statements(finally);
        }
        self.line("}");
    }
}

fn push_throws(signature: &mut String, throws: &[String]) {
    if !throws.is_empty() {
        signature.push_str(" throws ");
        signature.push_str(&throws.join(", "));
    }
}
