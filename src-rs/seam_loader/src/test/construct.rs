//! Model construction helpers shared by the resolver and flattener tests.

use seam_model::{Model, Prefix, Units};

/// An empty model with the given name.
pub(crate) fn empty_model(name: &str) -> Model {
    Model::new(name)
}

/// A model with one concrete top-level component holding the given
/// variables.
pub(crate) fn model_with_concrete_component(
    model_name: &str,
    component_name: &str,
    variable_names: &[&str],
) -> Model {
    let mut model = Model::new(model_name);
    let component = model.add_component(component_name);
    for name in variable_names {
        model.add_variable(component, *name);
    }
    model
}

/// A model with one top-level import stub.
pub(crate) fn model_with_component_stub(
    model_name: &str,
    stub_name: &str,
    url: &str,
    reference: &str,
) -> Model {
    let mut model = Model::new(model_name);
    let stub = model.add_component(stub_name);
    model.set_component_import(stub, url, reference);
    model
}

/// A small but structurally rich remote model: a `neuron` component with
/// math, a `mV`-typed membrane voltage, a nested `gate` child with its own
/// `V`, an internal equivalence between the two voltages, and a model-scope
/// `mV` units definition.
pub(crate) fn neuron_model() -> Model {
    let mut model = Model::new("remote");

    let neuron = model.add_component("neuron");
    model
        .component_mut(neuron)
        .set_math("dV/dt = (i_in - i_out) / Cm");
    let v = model.add_variable(neuron, "V");
    model.variable_mut(v).set_units("mV");
    model.add_variable(neuron, "t");

    let gate = model.add_child_component(neuron, "gate");
    let gate_v = model.add_variable(gate, "V");
    assert!(model.add_equivalence(v, gate_v));

    let mut mv = Units::new("mV");
    mv.add_unit("volt", Prefix::Milli, 1);
    model.add_units(mv);

    model
}
