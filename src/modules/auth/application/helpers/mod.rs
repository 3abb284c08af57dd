mod actor_resolver;

pub use actor_resolver::{ActorResolver, ResolveActorError};
