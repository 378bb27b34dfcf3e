use ahash::AHashSet;
use nk_domainlevel::Crn;
use nk_domainlevel::DomainKind;
use nk_domainlevel::Reaction;

use nuskell::Compiler;
use nuskell::CompilerConfig;
use nuskell::EvalError;
use nuskell::Implementation;
use nuskell::ReactionClass;
use nuskell::Scheme;
use nuskell::SchemeError;

const TWO_DOMAIN: &str = "cardelli_2domain_fixed_noGC";
const NM: &str = "cardelli2011_NM_noGC";

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn compile(scheme: &str, reactions: Vec<Reaction>) -> Result<Implementation, SchemeError> {
    Compiler::builtin(scheme).unwrap().compile(&Crn::new(reactions))
}

fn sequence(imp: &Implementation, name: &str) -> String {
    imp.complex(name).unwrap().complex.structure().sequence_string()
}

/// Every complex is connected, pairs complementary domains and names only
/// domains of this implementation.
fn assert_well_formed(imp: &Implementation) {
    let names: AHashSet<&str> = imp.domains.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names.len(), imp.domains.len(), "domain names are not unique");
    for c in imp.species.iter().chain(imp.complexes.iter()) {
        let structure = c.complex.structure();
        assert!(structure.check_complex().is_ok(), "{} is malformed: {}", c.name, structure);
        assert_eq!(structure.sequence().len(), structure.structure().len());
        for d in structure.domains() {
            assert!(names.contains(d.name.trim_end_matches('*')), "{} uses unknown {}", c.name, d.name);
        }
    }
}

#[test]
fn test_two_domain_one_input() {
    init();
    let imp = compile(TWO_DOMAIN, vec![Reaction::new(&["A"], &["B"])]).unwrap();
    println!("{imp}");
    assert_well_formed(&imp);

    assert_eq!(sequence(&imp, "A"), "t0 d0");
    assert_eq!(sequence(&imp, "B"), "t0 d1");
    assert!(!imp.complex("A").unwrap().complex.is_unbounded());

    assert_eq!(imp.complexes.len(), 6);
    assert_eq!(imp.unbounded_count(), 6);
    assert_eq!(sequence(&imp, "f0"), "d0 t0 + d3 d2 t0 + d2 + d2* t0* d2* t0* d0* t0*");
    assert_eq!(sequence(&imp, "f1"), "d0 t0");
    assert_eq!(sequence(&imp, "f2"), "t0 d2");
    assert_eq!(sequence(&imp, "f3"), "t0 d3");
    assert_eq!(sequence(&imp, "f4"), "d0 + t0 d1 + t0 d3 + d2 + t0* d2* d3* t0* d1* t0* d0*");
    assert_eq!(sequence(&imp, "f5"), "d1 t0");

    // one shared toehold, two formal and two gate domains
    let count = |kind| imp.domains.iter().filter(|d| d.kind == kind).count();
    assert_eq!(count(DomainKind::Short), 1);
    assert_eq!(count(DomainKind::Long), 4);
    assert!(imp.domains.iter().all(|d| !d.complement));
}

#[test]
fn test_two_domain_two_input() {
    init();
    let imp = compile(TWO_DOMAIN, vec![Reaction::new(&["A", "B"], &["C"])]).unwrap();
    assert_well_formed(&imp);
    assert_eq!(imp.complexes.len(), 7);
    assert_eq!(
        sequence(&imp, "f0"),
        "d0 t0 + d1 t0 + d4 d3 t0 + d3 + d3* t0* d3* t0* d1* t0* d0* t0*"
    );
    assert_eq!(sequence(&imp, "f6"), "d2 t0");
}

#[test]
fn test_two_domain_multiple_products() {
    let imp = compile(TWO_DOMAIN, vec![Reaction::new(&["A"], &["B", "C"])]).unwrap();
    assert_well_formed(&imp);
    // gate, three fuels, output gate and one signal per product
    assert_eq!(imp.complexes.len(), 7);
    assert_eq!(sequence(&imp, "f5"), "d1 t0");
    assert_eq!(sequence(&imp, "f6"), "d2 t0");
}

#[test]
fn test_two_domain_zero_products() {
    init();
    let imp = compile(TWO_DOMAIN, vec![Reaction::new(&["A"], &[])]).unwrap();
    println!("{imp}");
    assert_well_formed(&imp);
    assert_eq!(imp.complexes.len(), 5);
    assert_eq!(sequence(&imp, "f0"), "d0 t0 + d2 d1 t0 + d1 + d1* t0* d1* t0* d0* t0*");
    assert_eq!(sequence(&imp, "f1"), "d0 t0");
    assert_eq!(sequence(&imp, "f2"), "t0 d1");
    assert_eq!(sequence(&imp, "f3"), "t0 d2");
    // the output gate releases nothing
    assert_eq!(sequence(&imp, "f4"), "d0 + t0 d2 + d1 + t0* d1* d2* t0* d0*");
    assert_eq!(imp.domains.len(), 4);

    let imp = compile(TWO_DOMAIN, vec![Reaction::new(&["A", "B"], &[])]).unwrap();
    assert_well_formed(&imp);
    assert_eq!(imp.complexes.len(), 6);
    assert_eq!(
        sequence(&imp, "f0"),
        "d0 t0 + d1 t0 + d3 d2 t0 + d2 + d2* t0* d2* t0* d1* t0* d0* t0*"
    );
    assert_eq!(sequence(&imp, "f4"), "d1 t0");
    assert_eq!(sequence(&imp, "f5"), "d0 + t0 d3 + d2 + t0* d2* d3* t0* d0*");
}

#[test]
fn test_two_domain_unsupported_arity() {
    init();
    for reaction in [Reaction::new(&[], &["A"]), Reaction::new(&["A", "B", "C"], &["D"])] {
        let expected = reaction.arity();
        let err = compile(TWO_DOMAIN, vec![reaction]).unwrap_err();
        println!("{err}");
        let err = match err {
            SchemeError::Eval(err) => err,
            other => panic!("unexpected error {other:?}"),
        };
        assert!(matches!(err, EvalError::InReaction { .. }));
        match err.root_cause() {
            EvalError::UnsupportedArity { reactants, products, .. } => {
                assert_eq!((*reactants, *products), expected)
            }
            other => panic!("unexpected root cause {other:?}"),
        }
    }
}

#[test]
fn test_in_reaction_names_the_class() {
    let err = compile(TWO_DOMAIN, vec![Reaction::new(&["A", "B", "C"], &["D"])]).unwrap_err();
    let SchemeError::Eval(EvalError::InReaction { reaction, class, .. }) = err else { panic!() };
    assert_eq!(reaction, "A + B + C -> D");
    assert_eq!(class, ReactionClass::MultiInput);
}

#[test]
fn test_nm_zero_reactant() {
    init();
    let imp = compile(NM, vec![Reaction::new(&[], &["A"])]).unwrap();
    println!("{imp}");
    assert_well_formed(&imp);

    assert_eq!(sequence(&imp, "A"), "? t0 d0");
    assert_eq!(imp.complexes.len(), 4);
    assert_eq!(imp.unbounded_count(), 4);
    assert_eq!(sequence(&imp, "f0"), "d1 t2 + d2 t0 d0 + t0* d2* t2* d1* t1*");
    assert_eq!(sequence(&imp, "f1"), "t2 d2 t0");
    assert_eq!(sequence(&imp, "f2"), "d1 t2");
    // the fuel standing in for the missing reactant
    assert_eq!(sequence(&imp, "f3"), "? t1 d1");

    let names: Vec<_> = imp.domains.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, vec!["t0", "d0", "t1", "d1", "t2", "d2"]);
}

#[test]
fn test_nm_two_input() {
    init();
    let imp = compile(NM, vec![Reaction::new(&["A", "B"], &["C"])]).unwrap();
    assert_well_formed(&imp);
    assert_eq!(imp.complexes.len(), 4);
    assert_eq!(sequence(&imp, "f0"), "d0 t1 + d1 t3 + d3 t2 d2 + t2* d3* t3* d1* t1* d0* t0*");
    assert_eq!(sequence(&imp, "f1"), "t3 d3 t2");
    assert_eq!(sequence(&imp, "f2"), "d1 t3");
    // helper strand bridging the two inputs
    assert_eq!(sequence(&imp, "f3"), "d0 t1");
}

#[test]
fn test_nm_three_reactants_two_products() {
    init();
    let imp = compile(NM, vec![Reaction::new(&["A", "B", "C"], &["D", "E"])]).unwrap();
    println!("{imp}");
    assert_well_formed(&imp);
    assert_eq!(imp.complexes.len(), 5);
    assert_eq!(
        sequence(&imp, "f0"),
        "d0 t1 + d1 t2 + d2 t5 + d5 t3 d3 + d6 t4 d4 + t4* d6* t3* d5* t5* d2* t2* d1* t1* d0* t0*"
    );
    assert_eq!(sequence(&imp, "f1"), "t5 d5 t3 d6 t4");
    assert_eq!(sequence(&imp, "f2"), "d2 t5");
    // one helper strand per adjacent pair of reactants
    assert_eq!(sequence(&imp, "f3"), "d0 t1");
    assert_eq!(sequence(&imp, "f4"), "d1 t2");

    let count = |kind| imp.domains.iter().filter(|d| d.kind == kind).count();
    assert_eq!(count(DomainKind::Short), 6);
    assert_eq!(count(DomainKind::Long), 7);
}

#[test]
fn test_nm_zero_product_and_reversible() {
    let imp = compile(NM, vec![Reaction::new(&["A"], &[])]).unwrap();
    assert_well_formed(&imp);
    assert_eq!(imp.complexes.len(), 3);

    // the scheme splits reversible reactions itself
    let imp = compile(NM, vec![Reaction::reversible(&["A"], &["B"])]).unwrap();
    assert_well_formed(&imp);
    assert_eq!(imp.complexes.len(), 6);
}

#[test]
fn test_network_of_several_reactions() {
    init();
    let crn = Crn::new(vec![
        Reaction::new(&["A", "B"], &["C", "D"]),
        Reaction::new(&["C"], &["A"]),
        Reaction::new(&["D"], &["B"]),
    ]);
    for scheme in [TWO_DOMAIN, NM] {
        let imp = Compiler::builtin(scheme).unwrap().compile(&crn).unwrap();
        assert_well_formed(&imp);
        assert_eq!(imp.species.len(), 4);
        assert_eq!(imp.unbounded_count(), imp.complexes.len());
        for s in &imp.strands {
            assert!(!s.domains.is_empty());
        }
    }
}

#[test]
fn test_compilation_is_deterministic() {
    let crn = Crn::new(vec![
        Reaction::new(&["A", "B"], &["C"]),
        Reaction::new(&["C"], &["A", "B"]),
    ]);
    for scheme in [TWO_DOMAIN, NM] {
        let compiler = Compiler::builtin(scheme).unwrap();
        let first = compiler.compile(&crn).unwrap().to_json().unwrap();
        let second = compiler.compile(&crn).unwrap().to_json().unwrap();
        assert_eq!(first, second);
    }
}

#[test]
fn test_translate_single_reaction() {
    let compiler = Compiler::builtin(TWO_DOMAIN).unwrap();
    let imp = compiler.translate_reaction(&Reaction::new(&["A"], &["B"])).unwrap();
    let full = compiler.compile(&Crn::new(vec![Reaction::new(&["A"], &["B"])])).unwrap();
    assert_eq!(imp.to_json().unwrap(), full.to_json().unwrap());
}

#[test]
fn test_configured_lengths() {
    let config = CompilerConfig::from_json_str(r#"{ "short_length": 7, "long_length": 21 }"#).unwrap();
    let compiler = Compiler::with_config(Scheme::builtin(TWO_DOMAIN).unwrap(), config);
    let imp = compiler.compile(&Crn::new(vec![Reaction::new(&["A"], &["B"])])).unwrap();
    for d in &imp.domains {
        match d.kind {
            DomainKind::Short => assert_eq!(d.length, 7),
            DomainKind::Long => assert_eq!(d.length, 21),
        }
    }
}

#[test]
fn test_scheme_using_prelude() {
    let src = "
        class formal(s) = \"t x\" | \". .\" where { t = short(); x = long() };
        module main(crn) = sum(map(infty, map(formal, range(len(unirxn(crn))))))";
    let compiler = Compiler::new(Scheme::parse("counting", src).unwrap());
    let crn = Crn::new(vec![
        Reaction::new(&["A"], &["B"]),
        Reaction::new(&["A", "B"], &["C"]),
        Reaction::new(&["B"], &[]),
    ]);
    let imp = compiler.compile(&crn).unwrap();
    assert_eq!(imp.complexes.len(), 2);
    assert_eq!(imp.domains.len(), 10);
    assert_eq!(sequence(&imp, "f1"), "t4 d4");
}

#[test]
fn test_prelude_over_many_reactions() {
    init();
    let src = "
        class formal(s) = \"t x\" | \". .\" where { t = short(); x = long() };
        module main(crn) = sum(map(infty, map(formal, range(len(unirxn(crn)) + len(birxn(crn))))))";
    let compiler = Compiler::new(Scheme::parse("counting", src).unwrap());
    let reactions = (0..300)
        .map(|i| {
            let (a, b) = (format!("A{i}"), format!("B{i}"));
            if i % 3 == 0 {
                Reaction::new(&[a.as_str(), b.as_str()], &[])
            } else {
                Reaction::new(&[a.as_str()], &[b.as_str()])
            }
        })
        .collect();
    let imp = compiler.compile(&Crn::new(reactions)).unwrap();
    assert_eq!(imp.species.len(), 600);
    assert_eq!(imp.complexes.len(), 300);
}

#[test]
fn test_builtin_names() {
    let names: Vec<_> = Scheme::builtin_names().collect();
    assert!(names.contains(&TWO_DOMAIN));
    assert!(names.contains(&NM));
    assert!(matches!(Compiler::builtin("soloveichik2010"), Err(SchemeError::UnknownScheme(_))));
}
