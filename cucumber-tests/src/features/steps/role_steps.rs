use crate::features::world::QuireWorld;
use cucumber::{given, then};
use quire_core::rbac::{has_permission, permissions_for, Actor, Permission, PermissionSet, Role};

fn role(name: &str) -> Role {
    name.parse().unwrap_or_else(|e| panic!("bad role in feature file: {}", e))
}

fn permission(id: &str) -> Permission {
    id.parse().unwrap_or_else(|e| panic!("bad permission in feature file: {}", e))
}

#[given(expr = "an actor with role {string}")]
async fn given_actor_with_role(world: &mut QuireWorld, name: String) {
    world.actor = Some(Actor::new("actor", "Actor", Some(role(&name))));
}

#[given(expr = "an actor with no role")]
async fn given_roleless_actor(world: &mut QuireWorld) {
    world.actor = Some(Actor::roleless("actor"));
}

#[given(expr = "no actor")]
async fn given_no_actor(world: &mut QuireWorld) {
    world.actor = None;
}

#[then(expr = "the actor has {string}")]
async fn then_actor_has(world: &mut QuireWorld, id: String) {
    assert!(has_permission(world.actor.as_ref(), permission(&id)), "{:?} should hold {}", world.actor, id);
}

#[then(expr = "the actor lacks {string}")]
async fn then_actor_lacks(world: &mut QuireWorld, id: String) {
    assert!(!has_permission(world.actor.as_ref(), permission(&id)), "{:?} should not hold {}", world.actor, id);
}

#[then(expr = "the actor holds no permission")]
async fn then_actor_holds_nothing(world: &mut QuireWorld) {
    for p in Permission::ALL {
        assert!(!has_permission(world.actor.as_ref(), *p), "{:?} unexpectedly holds {}", world.actor, p);
    }
}

#[then(expr = "the {string} role includes every permission of the {string} role")]
async fn then_role_includes(_world: &mut QuireWorld, upper: String, lower: String) {
    let upper = permissions_for(Some(role(&upper)));
    let lower = permissions_for(Some(role(&lower)));
    assert!(upper.is_superset(&lower), "{:?} is not a superset of {:?}", upper, lower);
}

#[then(expr = "the {string} role adds exactly {string} over the {string} role")]
async fn then_role_adds_exactly(_world: &mut QuireWorld, upper: String, ids: String, lower: String) {
    let added = permissions_for(Some(role(&upper))).difference(&permissions_for(Some(role(&lower))));
    let expected: PermissionSet = ids.split(',').map(|id| permission(id.trim())).collect();
    assert_eq!(added, expected);
}

#[then(expr = "the {string} role holds every permission in the catalog")]
async fn then_role_holds_catalog(_world: &mut QuireWorld, name: String) {
    assert_eq!(permissions_for(Some(role(&name))), PermissionSet::all());
    let actor = Actor::new("actor", "Actor", Some(role(&name)));
    for p in Permission::ALL {
        assert!(has_permission(Some(&actor), *p));
    }
}
