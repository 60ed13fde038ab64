//! Shared schema for the integration tests

use std::sync::{Arc, Mutex};

use async_graphql::{Context, Data, EmptySubscription, Object, Result, Schema, SimpleObject};
use graphql_harness::prelude::*;

#[derive(Debug, Clone, SimpleObject)]
pub struct User {
	pub id: String,
	pub name: String,
}

/// Identity resolved from the `authorization` header
pub struct Viewer(pub String);

#[derive(Default, Clone)]
pub struct UserStore(Arc<Mutex<Vec<User>>>);

impl UserStore {
	fn users(&self) -> Vec<User> {
		self.0.lock().map(|users| users.clone()).unwrap_or_default()
	}

	fn insert(&self, name: String) -> User {
		let mut users = self.0.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
		let user = User {
			id: (users.len() + 1).to_string(),
			name,
		};
		users.push(user.clone());
		user
	}
}

pub struct QueryRoot;

#[Object]
impl QueryRoot {
	async fn current_user(&self, ctx: &Context<'_>) -> Option<User> {
		let viewer = ctx.data_opt::<Viewer>()?;
		Some(User {
			id: "1".to_string(),
			name: viewer.0.clone(),
		})
	}

	async fn users(&self, ctx: &Context<'_>) -> Result<Vec<User>> {
		Ok(ctx.data::<UserStore>()?.users())
	}

	async fn secret(&self) -> Result<Option<String>> {
		Err("Forbidden".into())
	}
}

pub struct MutationRoot;

#[Object]
impl MutationRoot {
	async fn create_user(&self, ctx: &Context<'_>, name: String) -> Result<User> {
		Ok(ctx.data::<UserStore>()?.insert(name))
	}
}

pub type AppSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

pub fn schema(store: UserStore) -> AppSchema {
	Schema::build(QueryRoot, MutationRoot, EmptySubscription)
		.data(store)
		.finish()
}

/// Resolves a [`Viewer`] from a `Bearer <name>` authorization header
pub fn viewer_context(request: &Request, _response: &mut Response) -> Result<Data, ContextError> {
	let mut data = Data::default();
	if let Some(name) = request
		.header("authorization")
		.and_then(|value| value.strip_prefix("Bearer "))
	{
		data.insert(Viewer(name.to_string()));
	}
	Ok(data)
}

pub fn server(store: UserStore) -> GraphQLServer<AppSchema> {
	GraphQLServer::builder(schema(store))
		.context_fn(viewer_context)
		.build()
}
