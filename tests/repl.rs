#[cfg(test)]
mod repl_tests {
    use fein::repl::{run_prompt, Repl};
    use pretty_assertions::assert_eq;

    /// Feeds `input` to the prompt, returning what went to stdout and stderr.
    fn session(input: &str) -> (String, String) {
        let mut out: Vec<u8> = Vec::new();
        let mut err: Vec<u8> = Vec::new();

        run_prompt(input.as_bytes(), &mut out, &mut err).unwrap();

        (String::from_utf8(out).unwrap(), String::from_utf8(err).unwrap())
    }

    #[test]
    fn test_repl_globals_persist_between_lines() {
        let (out, err) = session(
            "var a = 1;\nprint a + 1;\nfun f() { return a; }\nclass C { get() { return f(); } }\nprint C().get();\n",
        );

        assert_eq!(out, "> > 2\n> > > 1\n> ");
        assert_eq!(err, "");
    }

    #[test]
    fn test_repl_runtime_error_keeps_going() {
        let (out, err) = session("var c = 1; print nope; c = 2;\nprint c;\n");

        // statements before the failure ran, the rest of the line did not
        assert_eq!(out, "> > 1\n> ");
        assert_eq!(err, "Undefined variable 'nope'.\n[line 1]\n");
    }

    #[test]
    fn test_repl_static_errors_keep_going() {
        let (out, err) = session("print ;\nreturn 1;\nprint 3;\n");

        assert_eq!(out, "> > > 3\n> ");
        assert_eq!(
            err,
            "[line 1] Error at ';': Expect expression.\n\
             [line 1] Error at 'return': Can't return from top-level code.\n"
        );
    }

    #[test]
    fn test_repl_closure_from_earlier_line_keeps_its_binding() {
        // the second line's nested locals must not disturb how the closure
        // declared on the first line finds `x`
        let (out, err) = session(
            "var h; { var x = \"kept\"; fun g() { return x; } h = g; }\n\
             { var y = 1; { { print y; } } }\n\
             print h();\n",
        );

        assert_eq!(out, "> > 1\n> kept\n> ");
        assert_eq!(err, "");
    }

    #[test]
    fn test_repl_last_line_without_newline() {
        let (out, _) = session("print \"end\";");

        assert_eq!(out, "> end\n> ");
    }

    #[test]
    fn test_repl_eval_directly() {
        let mut buf: Vec<u8> = Vec::new();

        {
            let mut repl = Repl::new(Box::new(&mut buf));
            repl.eval("var greeting = \"hi\";".to_string()).unwrap();
            repl.eval("print greeting;".to_string()).unwrap();

            let error = repl.eval("print greeting +;".to_string()).unwrap_err();
            assert_eq!(error.exit_code(), 65);
        }

        assert_eq!(String::from_utf8(buf).unwrap(), "hi\n");
    }
}
