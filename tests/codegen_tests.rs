// Integration tests for the layout and sketch passes

use beaglec::codegen::naming;
use beaglec::codegen::{CodegenError, LayoutGenerator, SketchGenerator};
use beaglec::config::{CompilerConfig, EmitMode};
use beaglec::driver::{compile, CompileError};
use beaglec::parser::ast::{CompilationUnit, QualifiedName};
use beaglec::parser::context::CompilationContext;
use beaglec::parser::lexer::Scanner;
use beaglec::parser::parse::Parser;

const SHAPES: &str = r#"
package shapes

import lang.*

@Serializable
public class Circle : Shape {
    var radius: int32 = 1
    const KIND = "circle"
    def area(): int32 { return radius * radius * 3 }
}

class Shape {
    var name = "shape"
    def area(): int32 { }
}
"#;

fn parse(source: &str) -> CompilationUnit {
    let mut context = CompilationContext::new();
    let unit = Parser::new(&mut context, Scanner::new(source, "shapes.bgl")).parse();
    assert!(!context.has_errors(), "{:?}", context.diagnostics());
    unit.unwrap()
}

fn name(text: &str) -> QualifiedName {
    QualifiedName::from_dotted(text).unwrap()
}

#[test]
fn test_naming_is_injective_across_packages() {
    let a = name("pkg.A");
    let b = name("pkg2.A");
    assert_ne!(naming::static_record(&a), naming::static_record(&b));
    assert_ne!(naming::dynamic_record(&a), naming::dynamic_record(&b));
    assert_ne!(naming::storage_slot(&a), naming::storage_slot(&b));
    assert_ne!(naming::initializer(&a), naming::initializer(&b));
}

#[test]
fn test_parent_and_root_initializers() {
    let output = LayoutGenerator::new().generate(&parse(SHAPES)).unwrap();

    // Shape has no parent
    assert!(output.contains("   type_shapes_Shape_.typeInfo__.base = NULL;\n"));
    assert!(output.contains("   type_shapes_Shape_.base__ = NULL;\n"));

    // Circle points at Shape
    assert!(output.contains(
        "   type_shapes_Circle_.typeInfo__.base = &(type_shapes_Shape_.typeInfo__);\n"
    ));
    assert!(output.contains("   type_shapes_Circle_.base__ = &type_shapes_Shape_;\n"));
    assert!(output.contains("   type_shapes_Circle_.typeInfo__.name = \"shapes.Circle\";\n"));
}

#[test]
fn test_parent_emitted_before_child() {
    let output = LayoutGenerator::new().generate(&parse(SHAPES)).unwrap();
    let shape = output.find("} dynamic_shapes_Shape_;").unwrap();
    let circle = output.find("} dynamic_shapes_Circle_;").unwrap();
    assert!(shape < circle);
}

#[test]
fn test_generation_is_byte_identical() {
    let unit = parse(SHAPES);
    let generator = LayoutGenerator::new();
    let first = generator.generate(&unit).unwrap();
    let second = generator.generate(&unit).unwrap();
    assert_eq!(first, second);

    assert_eq!(SketchGenerator::generate(&unit), SketchGenerator::generate(&unit));

    // a fresh parse of the same text gives the same output too
    assert_eq!(first, generator.generate(&parse(SHAPES)).unwrap());
}

#[test]
fn test_sketch_of_shapes() {
    let output = SketchGenerator::generate(&parse(SHAPES));
    let expected = "\
; module 'shapes'
@.module.shapes = private constant [7 x i8] c\"shapes\\00\"
; Type 'shapes.Circle'
%.dyn.shapes.Circle = type { %.classref, %.dyn.int32 }
; method of 'shapes.Circle'
define void @shapes.Circle.area() {}

; Type 'shapes.Shape'
%.dyn.shapes.Shape = type { %.classref, %.dyn.string }
; method of 'shapes.Shape'
define void @shapes.Shape.area() {}

";
    assert_eq!(output, expected);
}

#[test]
fn test_driver_selects_pass() {
    let layout = compile(SHAPES, "shapes.bgl", &CompilerConfig::default()).unwrap();
    assert!(layout.contains("#include <beagle/base.h>"));

    let config = CompilerConfig {
        emit: EmitMode::Sketch,
        runtime_header: "unused.h".to_string(),
        ..CompilerConfig::default()
    };
    let sketch = compile(SHAPES, "shapes.bgl", &config).unwrap();
    assert!(sketch.starts_with("; module 'shapes'"));
    assert!(!sketch.contains("#include"));
}

#[test]
fn test_small_lookahead_capacity() {
    let config = CompilerConfig {
        lookahead_capacity: 1,
        ..CompilerConfig::default()
    };
    assert_eq!(
        compile(SHAPES, "shapes.bgl", &config).unwrap(),
        compile(SHAPES, "shapes.bgl", &CompilerConfig::default()).unwrap()
    );
}

#[test]
fn test_cycle_reported_by_driver() {
    let err = compile("class A : B {}\nclass B : A {}", "c.bgl", &CompilerConfig::default())
        .unwrap_err();
    match err {
        CompileError::Codegen(CodegenError::CyclicInheritance { type_name }) => {
            assert!(type_name == "A" || type_name == "B");
        }
        other => panic!("unexpected error: {other}"),
    }
}
