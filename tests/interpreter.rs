#[cfg(test)]
mod interpreter_tests {
    use fein::error::{RunError, RuntimeErrorKind};
    use pretty_assertions::assert_eq;

    /// Runs `source` and returns everything it printed.
    fn output(source: &str) -> String {
        let mut out: Vec<u8> = Vec::new();

        if let Err(e) = fein::run(source, &mut out) {
            panic!("program failed: {}", e);
        }

        String::from_utf8(out).unwrap()
    }

    /// Runs `source`, which must fail, returning its printed output and the
    /// error.
    fn failure(source: &str) -> (String, RunError) {
        let mut out: Vec<u8> = Vec::new();

        let error = fein::run(source, &mut out).unwrap_err();

        (String::from_utf8(out).unwrap(), error)
    }

    fn runtime_kind(source: &str) -> RuntimeErrorKind {
        match failure(source).1 {
            RunError::Runtime(e) => e.kind,
            other => panic!("expected a runtime error, got {:?}", other),
        }
    }

    // ── values & operators ────────────────────────────────────────────

    #[test]
    fn test_interpreter_print_literals() {
        assert_eq!(
            output("print nil; print true; print 3.0; print 2.5; print \"hi\"; print -0;"),
            "nil\ntrue\n3\n2.5\nhi\n-0\n"
        );
    }

    #[test]
    fn test_interpreter_arithmetic_and_comparison() {
        assert_eq!(
            output("print 1 + 2 * 3; print (1 + 2) * 3; print 10 / 4; print 3 - 5; print 2 <= 2; print 1 > 2;"),
            "7\n9\n2.5\n-2\ntrue\nfalse\n"
        );
    }

    #[test]
    fn test_interpreter_string_concatenation_coerces_numbers() {
        assert_eq!(
            output("print \"a\" + \"b\"; print \"n=\" + 3; print 1.5 + \"x\";"),
            "ab\nn=3\n1.5x\n"
        );
    }

    #[test]
    fn test_interpreter_equality() {
        assert_eq!(
            output("print nil == nil; print nil == false; print 1 == 1; print \"a\" != \"a\"; print 1 == \"1\";"),
            "true\nfalse\ntrue\nfalse\nfalse\n"
        );
    }

    #[test]
    fn test_interpreter_truthiness_and_logic() {
        assert_eq!(
            output("print !nil; print !0; print nil or \"default\"; print 1 and 2; print false and undefined;"),
            "true\nfalse\ndefault\n2\nfalse\n"
        );
    }

    #[test]
    fn test_interpreter_division() {
        assert_eq!(output("print 10 / 2;"), "5\n");
        assert_eq!(runtime_kind("print 10 / 0;"), RuntimeErrorKind::DivisionByZero);
    }

    #[test]
    fn test_interpreter_division_rejects_divisor_printed_with_leading_zero() {
        assert_eq!(runtime_kind("print 1 / 0.5;"), RuntimeErrorKind::DivisionByZero);
        assert_eq!(output("print 1 / -0 < 0;"), "true\n");
    }

    #[test]
    fn test_interpreter_division_by_divisor_printed_in_exponent_form() {
        // 0.0001 is 1.0E-4 as a double, so it is a valid divisor
        assert_eq!(output("print 1 / 0.0001;"), "10000\n");

        assert_eq!(runtime_kind("print 1 / 0.001;"), RuntimeErrorKind::DivisionByZero);
        assert_eq!(runtime_kind("print 1 / 0;"), RuntimeErrorKind::DivisionByZero);
    }

    #[test]
    fn test_interpreter_block_comments_run() {
        assert_eq!(output("/* a comment */ print 1;"), "1\n");
        assert_eq!(output("print /* inline */ 2;\n/* spans\nlines */ print 3;"), "2\n3\n");

        let (printed, error) = failure("print 1; /* never closed");
        assert_eq!(printed, "");
        assert_eq!(error.exit_code(), 65);
        assert_eq!(error.to_string(), "[line 1] Error: Unterminated block comment.");
    }

    #[test]
    fn test_interpreter_type_errors() {
        assert_eq!(runtime_kind("print true + 1;"), RuntimeErrorKind::TypeError);
        assert_eq!(runtime_kind("print -\"a\";"), RuntimeErrorKind::TypeError);
        assert_eq!(runtime_kind("print \"a\" < 1;"), RuntimeErrorKind::TypeError);

        let (_, error) = failure("print nil + 1;");
        assert_eq!(
            error.to_string(),
            "Operands must be numbers or strings.\n[line 1]"
        );
        assert_eq!(error.exit_code(), 70);
    }

    // ── variables & scope ─────────────────────────────────────────────

    #[test]
    fn test_interpreter_block_shadowing() {
        assert_eq!(
            output(
                "var a = \"global\";
                 {
                   var a = \"outer\";
                   {
                     var a = \"inner\";
                     print a;
                   }
                   print a;
                 }
                 print a;"
            ),
            "inner\nouter\nglobal\n"
        );
    }

    #[test]
    fn test_interpreter_assignment_returns_value() {
        assert_eq!(output("var a; var b; a = b = 3; print a; print b;"), "3\n3\n");
    }

    #[test]
    fn test_interpreter_undefined_variable() {
        let (_, error) = failure("print missing;");

        assert!(matches!(
            &error,
            RunError::Runtime(e) if e.kind == RuntimeErrorKind::UndefinedVariable
        ));
        assert_eq!(error.to_string(), "Undefined variable 'missing'.\n[line 1]");

        assert_eq!(
            runtime_kind("missing = 1;"),
            RuntimeErrorKind::UndefinedVariable
        );
    }

    #[test]
    fn test_interpreter_control_flow() {
        assert_eq!(
            output(
                "var i = 0;
                 while (i < 3) { print i; i = i + 1; }
                 for (var j = 0; j < 2; j = j + 1) print \"j\" + j;
                 if (i == 3) print \"yes\"; else print \"no\";"
            ),
            "0\n1\n2\nj0\nj1\nyes\n"
        );
    }

    // ── functions & closures ──────────────────────────────────────────

    #[test]
    fn test_interpreter_functions_and_recursion() {
        assert_eq!(
            output(
                "fun fib(n) { if (n < 2) return n; return fib(n - 1) + fib(n - 2); }
                 print fib(10);
                 fun noop() {}
                 print noop();
                 print fib;
                 print clock;"
            ),
            "55\nnil\n<fn fib>\n<native fn clock>\n"
        );
    }

    #[test]
    fn test_interpreter_closure_counter() {
        assert_eq!(
            output(
                "fun makeCounter() {
                   var i = 0;
                   fun count() { i = i + 1; print i; }
                   return count;
                 }
                 var counter = makeCounter();
                 counter();
                 counter();
                 var other = makeCounter();
                 other();"
            ),
            "1\n2\n1\n"
        );
    }

    #[test]
    fn test_interpreter_closure_binding_is_static() {
        assert_eq!(
            output(
                "var a = \"global\";
                 {
                   fun showA() { print a; }
                   showA();
                   var a = \"block\";
                   showA();
                 }"
            ),
            "global\nglobal\n"
        );
    }

    #[test]
    fn test_interpreter_return_unwinds_loops() {
        assert_eq!(
            output(
                "fun first() { while (true) { for (;;) { return \"out\"; } } }
                 print first();"
            ),
            "out\n"
        );
    }

    #[test]
    fn test_interpreter_clock_is_a_number() {
        assert_eq!(output("print clock() > 0;"), "true\n");
    }

    #[test]
    fn test_interpreter_call_errors() {
        let (_, error) = failure("fun f(a, b) {}\nf(1);");
        assert_eq!(error.to_string(), "Expected 2 arguments but got 1.\n[line 2]");

        assert_eq!(runtime_kind("\"str\"();"), RuntimeErrorKind::NotCallable);
        assert_eq!(runtime_kind("clock(1);"), RuntimeErrorKind::ArityMismatch);
    }

    // ── classes ───────────────────────────────────────────────────────

    #[test]
    fn test_interpreter_class_fields_and_methods() {
        assert_eq!(
            output(
                "class Point {
                   init(x, y) { this.x = x; this.y = y; }
                   sum() { return this.x + this.y; }
                 }
                 var p = Point(1, 2);
                 print p.sum();
                 p.x = 10;
                 print p.sum();
                 print Point;
                 print p;"
            ),
            "3\n12\nPoint\nPoint instance\n"
        );
    }

    #[test]
    fn test_interpreter_bound_method_keeps_this() {
        assert_eq!(
            output(
                "class Greeter {
                   init(name) { this.name = name; }
                   greet() { print \"hi \" + this.name; }
                 }
                 var g = Greeter(\"ada\").greet;
                 g();"
            ),
            "hi ada\n"
        );
    }

    #[test]
    fn test_interpreter_fields_shadow_methods() {
        assert_eq!(
            output(
                "class A { m() { return \"method\"; } }
                 var a = A();
                 fun f() { return \"field\"; }
                 a.m = f;
                 print a.m();"
            ),
            "field\n"
        );
    }

    #[test]
    fn test_interpreter_inheritance() {
        assert_eq!(
            output(
                "class Animal {
                   speak() { return \"...\"; }
                   name() { return \"animal\"; }
                 }
                 class Dog < Animal {
                   speak() { return \"woof\"; }
                 }
                 class Puppy < Dog {}
                 var p = Puppy();
                 print p.speak();
                 print p.name();"
            ),
            "woof\nanimal\n"
        );
    }

    #[test]
    fn test_interpreter_initializer_returns_instance() {
        assert_eq!(
            output(
                "class Box {
                   init(v) { this.v = v; return; }
                 }
                 var b = Box(1);
                 print b.init(2) == b;
                 print b.v;"
            ),
            "true\n2\n"
        );
    }

    #[test]
    fn test_interpreter_inherited_initializer_sets_arity() {
        assert_eq!(
            output(
                "class Base { init(a) { this.a = a; } }
                 class Derived < Base {}
                 print Derived(7).a;"
            ),
            "7\n"
        );
        assert_eq!(
            runtime_kind("class Base { init(a) {} } class Derived < Base {} Derived();"),
            RuntimeErrorKind::ArityMismatch
        );
    }

    #[test]
    fn test_interpreter_property_errors() {
        assert_eq!(
            runtime_kind("class A {} print A().missing;"),
            RuntimeErrorKind::UndefinedProperty
        );
        assert_eq!(runtime_kind("var x = 1; print x.y;"), RuntimeErrorKind::TypeError);
        assert_eq!(runtime_kind("var x = 1; x.y = 2;"), RuntimeErrorKind::TypeError);
        assert_eq!(
            runtime_kind("var NotAClass = 1; class B < NotAClass {}"),
            RuntimeErrorKind::TypeError
        );
    }

    #[test]
    fn test_interpreter_object_equality_is_identity() {
        assert_eq!(
            output(
                "class A {}
                 var a = A();
                 var b = A();
                 print a == a;
                 print a == b;
                 print A == A;"
            ),
            "true\nfalse\ntrue\n"
        );
    }

    // ── error pipeline ────────────────────────────────────────────────

    #[test]
    fn test_interpreter_runtime_error_keeps_prior_output() {
        let (out, error) = failure("print \"before\";\nprint 1 + nil;\nprint \"after\";");

        assert_eq!(out, "before\n");
        assert_eq!(error.exit_code(), 70);
    }

    #[test]
    fn test_interpreter_syntax_error_runs_nothing() {
        let (out, error) = failure("print \"never\";\nprint ;");

        assert_eq!(out, "");
        assert!(matches!(error, RunError::Syntax(ref errors) if errors.len() == 1));
        assert_eq!(error.exit_code(), 65);
        assert_eq!(error.to_string(), "[line 2] Error at ';': Expect expression.");
    }

    #[test]
    fn test_interpreter_lexical_and_syntax_errors_reported_together() {
        let (out, error) = failure("print 1;\nvar $ = 2;\nprint (3;");

        assert_eq!(out, "");
        assert_eq!(
            error.to_string(),
            "[line 2] Error: Unexpected character: $\n\
             [line 2] Error at '=': Expect variable name.\n\
             [line 3] Error at ';': Expect ')' after expression."
        );
    }

    #[test]
    fn test_interpreter_resolution_error_runs_nothing() {
        let (out, error) = failure("print \"never\";\n{ var a = 1; var a = 2; }");

        assert_eq!(out, "");
        assert!(matches!(error, RunError::Resolve(_)));
        assert_eq!(error.exit_code(), 65);
    }
}
