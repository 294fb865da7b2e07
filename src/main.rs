use belief_net::{
    arithmetic, solve, Constraint, Jtms, Label, LatticeKind, Network, PropagatorOutput, Value,
};
use std::collections::{BTreeMap, BTreeSet};

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    println!("belief-net demo");
    println!("===============\n");

    println!("1. Adder: forward and backward derivation");
    demo_adder()?;

    println!("\n2. Contradiction and recovery");
    demo_contradiction_and_recovery()?;

    println!("\n3. Non-monotonic default reasoning");
    demo_non_monotonic_default();

    println!("\n4. Diamond cascade");
    demo_diamond_cascade()?;

    println!("\n5. AC-3 + backtracking solver");
    demo_solver()?;

    Ok(())
}

fn demo_adder() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let net = Network::new();
    let a = net.create_cell(LatticeKind::Number);
    let b = net.create_cell(LatticeKind::Number);
    let sum = net.create_cell(LatticeKind::Number);
    arithmetic::adder(&net, a, b, sum)?;

    net.add_content(a, Value::Number(40.0), "sensor-a")?;
    net.add_content(b, Value::Number(2.0), "sensor-b")?;
    println!("   40 + 2 -> sum = {:?}", net.read_cell(sum)?);

    let net2 = Network::new();
    let a2 = net2.create_cell(LatticeKind::Number);
    let b2 = net2.create_cell(LatticeKind::Number);
    let sum2 = net2.create_cell(LatticeKind::Number);
    arithmetic::adder(&net2, a2, b2, sum2)?;
    net2.add_content(sum2, Value::Number(42.0), "sensor-sum")?;
    net2.add_content(b2, Value::Number(2.0), "sensor-b")?;
    println!("   sum = 42, b = 2 -> a = {:?}", net2.read_cell(a2)?);

    Ok(())
}

fn demo_contradiction_and_recovery() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let net = Network::new();
    let a = net.create_cell(LatticeKind::Number);
    let b = net.create_cell(LatticeKind::Number);
    let sum = net.create_cell(LatticeKind::Number);
    arithmetic::adder(&net, a, b, sum)?;

    net.add_content(a, Value::Number(40.0), "sensor-a")?;
    net.add_content(b, Value::Number(2.0), "sensor-b")?;
    net.add_content(sum, Value::Number(100.0), "bad-sensor")?;
    println!("   after bad reading: sum = {:?}", net.read_cell(sum)?);

    net.retract_content(sum, "bad-sensor")?;
    println!("   after retraction:  sum = {:?}", net.read_cell(sum)?);

    Ok(())
}

fn demo_non_monotonic_default() {
    let mut jtms = Jtms::new();
    let bird = jtms.create_node("bird");
    let abnormal = jtms.create_node("abnormal");
    let flies = jtms.create_node("flies");

    jtms.assume_node(bird);
    jtms.justify_node(flies, "default: birds fly unless abnormal", &[bird], &[abnormal]);
    println!("   Tweety is a bird -> flies: {:?}", jtms.node_label(flies));

    jtms.assume_node(abnormal);
    println!("   Tweety is abnormal -> flies: {:?}", jtms.node_label(abnormal));
    println!("   flies: {:?}", jtms.node_label(flies));

    jtms.retract_assumption(abnormal);
    println!("   abnormality retracted -> flies: {:?}", jtms.node_label(flies));
    assert_eq!(jtms.node_label(flies), Label::In);
}

fn demo_diamond_cascade() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let net = Network::new();
    let top = net.create_cell(LatticeKind::Number);
    let left = net.create_cell(LatticeKind::Number);
    let right = net.create_cell(LatticeKind::Number);
    let bottom = net.create_cell(LatticeKind::Number);

    net.create_propagator(
        &[top],
        &[left],
        "copy:left",
        Box::new(move |inputs| match &inputs[0] {
            Value::Number(x) => PropagatorOutput::Write(vec![(left, Value::Number(*x))]),
            _ => PropagatorOutput::Skip,
        }),
    )?;
    net.create_propagator(
        &[top],
        &[right],
        "copy:right",
        Box::new(move |inputs| match &inputs[0] {
            Value::Number(x) => PropagatorOutput::Write(vec![(right, Value::Number(*x))]),
            _ => PropagatorOutput::Skip,
        }),
    )?;
    net.create_propagator(
        &[left, right],
        &[bottom],
        "join",
        Box::new(move |inputs| match (&inputs[0], &inputs[1]) {
            (Value::Number(x), Value::Number(y)) if x == y => {
                PropagatorOutput::Write(vec![(bottom, Value::Number(*x))])
            }
            _ => PropagatorOutput::Skip,
        }),
    )?;

    net.add_content(top, Value::Number(7.0), "source")?;
    println!("   top = 7 -> bottom = {:?}", net.read_cell(bottom)?);

    Ok(())
}

fn demo_solver() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let mut domains = BTreeMap::new();
    for v in ["a", "b", "c"] {
        domains.insert(v.to_string(), BTreeSet::from([1, 2, 3]));
    }
    let constraints = vec![
        Constraint::binary("a", "b", |x, y| x != y),
        Constraint::binary("b", "c", |x, y| x != y),
        Constraint::binary("a", "c", |x, y| x != y),
    ];
    let solution = solve(domains, constraints)?;
    println!("   3-coloring of a triangle: {solution:?}");

    Ok(())
}
