use crate::{
    java_ast::{Member, TypeDeclaration},
    transformations::TransformOptions,
};

/// `prefix + name + suffix`
pub fn generated_name(name: &str, options: &TransformOptions) -> String {
    format!("{}{name}{}", options.prefix, options.suffix)
}

/// Rename the type and every constructor that carries its old name.
///
/// Returns the name the type had before.
pub fn rename_type(decl: &mut TypeDeclaration, options: &TransformOptions) -> String {
    let new_name = generated_name(&decl.name, options);
    let old_name = std::mem::replace(&mut decl.name, new_name);

    for member in &mut decl.members {
        if let Member::Constructor(constructor) = member
            && constructor.name == old_name
        {
            constructor.name.clone_from(&decl.name);
        }
    }

    old_name
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::parser::parse;

    fn parse_type(source: &str) -> TypeDeclaration {
        parse(source)
            .expect("should parse")
            .types()
            .next()
            .cloned()
            .expect("one type")
    }

    fn options(prefix: &str, suffix: &str) -> TransformOptions {
        TransformOptions {
            prefix: prefix.to_owned(),
            suffix: suffix.to_owned(),
            ..TransformOptions::default()
        }
    }

    #[test]
    fn test_renames_type_and_constructors() {
        let mut decl = parse_type("class Reader {\n    Reader() {}\n    Reader(int x) {}\n}\n");
        let old = rename_type(&mut decl, &options("Unchecked", "Impl"));
        assert_eq!(old, "Reader");
        assert_eq!(decl.name, "UncheckedReaderImpl");
        let names: Vec<&str> = decl.constructors().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["UncheckedReaderImpl", "UncheckedReaderImpl"]);
    }

    #[test]
    fn test_empty_prefix_and_suffix_is_noop() {
        let source = "class Reader {\n    Reader() {}\n}\n";
        let mut decl = parse_type(source);
        rename_type(&mut decl, &options("", ""));
        assert_eq!(decl, parse_type(source));
    }

    #[test]
    fn test_rename_from_fresh_tree_is_repeatable() {
        let source = "class Reader {\n    Reader() {}\n}\n";
        let mut first = parse_type(source);
        let mut second = parse_type(source);
        rename_type(&mut first, &options("Unchecked", ""));
        rename_type(&mut second, &options("Unchecked", ""));
        assert_eq!(first, second);
    }

    #[test]
    fn test_renames_record_compact_constructor() {
        let mut decl = parse_type(
            "record R(int x) {\n    R {\n        if (x < 0) throw new IllegalArgumentException();\n    }\n}\n",
        );
        rename_type(&mut decl, &options("Unchecked", ""));
        assert_eq!(decl.name, "UncheckedR");
        let ctor = decl.constructors().next().expect("compact constructor");
        assert_eq!(ctor.name, "UncheckedR");
        assert_eq!(ctor.parameters, None);
    }

    #[test]
    fn test_methods_named_like_the_type_are_untouched() {
        let mut decl = parse_type("class Reader {\n    void Reader() {}\n}\n");
        rename_type(&mut decl, &options("Unchecked", ""));
        assert!(decl.procedure("Reader").is_some());
    }
}
