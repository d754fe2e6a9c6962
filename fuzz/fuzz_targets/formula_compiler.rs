#![no_main]

use benchls::expr::{compile, compile_list, Binding, SymbolTable};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        let symbols = SymbolTable::new(["M", "N"]);

        // Compilation must return a typed error, never panic
        if let Ok(program) = compile(input, &symbols.with_response()) {
            // A compiled program always evaluates against a covering binding
            let binding: Binding = [("M", 3.0), ("N", 7.0), ("Y", 11.0)].into_iter().collect();
            assert!(program.evaluate(&binding).is_ok());

            // and its canonical form compiles back to the same instructions
            let again = compile(&program.canonical(), &symbols.with_response())
                .expect("canonical form must recompile");
            assert_eq!(again.instructions(), program.instructions());
        }

        let _ = compile_list(input, &symbols);
    }
});
