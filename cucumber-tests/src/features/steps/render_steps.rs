use crate::features::world::{parse_requirement, QuireWorld};
use cucumber::{given, then, when};
use quire_core::rbac::{Actor, CapabilityQuery, Role};
use quire_core::render::{Gate, GateState};
use quire_core::session::{Resolution, VerificationError};

fn observe(world: &mut QuireWorld) {
    let state = world.provider.current();
    if let Some(gate) = world.gate.as_mut() {
        gate.observe(&state);
    }
}

fn gate(world: &QuireWorld) -> &Gate {
    world.gate.as_ref().expect("no gate mounted")
}

#[given(expr = "a gate requiring {string}")]
async fn given_gate(world: &mut QuireWorld, requirement: String) {
    world.gate = Some(Gate::new(parse_requirement(&requirement)));
    observe(world);
}

#[when(expr = "the session resolves to an actor with role {string}")]
async fn when_resolves_to_role(world: &mut QuireWorld, role: String) {
    let role: Role = role.parse().expect("valid role");
    let actor = Actor::new("reader", "Reader", Some(role));
    world.provider.load(|| async move { Ok(Resolution::Authenticated(actor)) }).await;
    observe(world);
}

#[when(expr = "the session resolves anonymously")]
async fn when_resolves_anonymously(world: &mut QuireWorld) {
    world.provider.load(|| async { Ok(Resolution::Unauthenticated) }).await;
    observe(world);
}

#[when(expr = "the session fails to verify")]
async fn when_resolution_fails(world: &mut QuireWorld) {
    world.provider.load(|| async { Err(VerificationError::BadSignature) }).await;
    observe(world);
}

#[when(expr = "the actor signs out")]
async fn when_signs_out(world: &mut QuireWorld) {
    world.provider.sign_out();
    observe(world);
}

#[when(expr = "the actor signs out before the session resolves to role {string}")]
async fn when_signs_out_mid_resolution(world: &mut QuireWorld, role: String) {
    let role: Role = role.parse().expect("valid role");
    let actor = Actor::new("reader", "Reader", Some(role));
    let (release, resolved) = tokio::sync::oneshot::channel::<()>();

    let provider = &world.provider;
    let load = provider.load(|| async move {
        let _ = resolved.await;
        Ok(Resolution::Authenticated(actor))
    });
    let sign_out = async {
        tokio::task::yield_now().await;
        provider.sign_out();
        let _ = release.send(());
    };
    tokio::join!(load, sign_out);
    observe(world);
}

#[then(expr = "the gate is {string}")]
async fn then_gate_state(world: &mut QuireWorld, expected: String) {
    let expected = match expected.as_str() {
        "loading" => GateState::Loading,
        "denied" => GateState::Denied,
        "granted" => GateState::Granted,
        other => panic!("unknown gate state in feature file: {}", other),
    };
    assert_eq!(gate(world).state(), expected);
}

#[then(expr = "it renders the content")]
async fn then_renders_content(world: &mut QuireWorld) {
    assert_eq!(gate(world).render(|| "content", || "fallback"), "content");
}

#[then(expr = "it renders the fallback")]
async fn then_renders_fallback(world: &mut QuireWorld) {
    assert_eq!(gate(world).render(|| "content", || "fallback"), "fallback");
}

#[then(expr = "every capability check fails while loading")]
async fn then_loading_denies(world: &mut QuireWorld) {
    let state = world.provider.current();
    assert!(state.is_loading());
    assert!(!state.can_access_admin());
}
