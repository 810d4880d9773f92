//! A small to-do API mapped from attributes, with a validated completion
//! endpoint.

use std::sync::Arc;

use genesis::prelude::*;
use genesis_test::TestClient;
use http::StatusCode;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
enum TodoState {
    Open,
    Done,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct Todo {
    id: usize,
    title: String,
    state: TodoState,
}

#[derive(Debug, Deserialize)]
struct NewTodo {
    title: String,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(transparent)]
struct TodoId(usize);

#[derive(Default)]
struct TodoService {
    todos: RwLock<Vec<Todo>>,
}

#[endpoints(route = "api", crate = "genesis::server")]
impl TodoService {
    #[get("todos")]
    fn all(&self) -> Json<Vec<Todo>> {
        Json(self.todos.read().clone())
    }

    #[get("todos/{id}")]
    fn one(&self, Path(id): Path<usize>) -> Option<Json<Todo>> {
        self.todos.read().get(id).cloned().map(Json)
    }

    #[put("todos")]
    fn add(&self, Query(new): Query<NewTodo>) -> Json<Todo> {
        let mut todos = self.todos.write();
        let todo = Todo {
            id: todos.len(),
            title: new.title,
            state: TodoState::Open,
        };
        todos.push(todo.clone());
        Json(todo)
    }

    #[post("todos/complete")]
    #[validate(TodoId)]
    fn complete(&self, id: Validatable<TodoId>) -> Option<Json<Todo>> {
        let mut todos = self.todos.write();
        let todo = todos.get_mut(id.0 .0)?;
        todo.state = TodoState::Done;
        Some(Json(todo.clone()))
    }

    fn len(&self) -> usize {
        self.todos.read().len()
    }
}

fn todo_id_rules(todos: Arc<TodoService>) -> RuleSet<TodoId> {
    rule_for(
        Property::named("Id", |id: &TodoId| id.0),
        move |id: &usize| *id < todos.len(),
        "No to-do with that id",
    )
}

fn client() -> TestClient {
    let mut app = App::new();
    app.services_mut()
        .add_singleton_endpoints(|_| Ok(TodoService::default()))
        .add_scoped_validator::<TodoId, _, _>(|scope| {
            Ok(todo_id_rules(scope.resolve::<TodoService>()?))
        });
    app.map_endpoints::<TodoService>().unwrap();
    TestClient::new(app)
}

async fn add(client: &TestClient, title: &str) -> Todo {
    let response = client
        .put(format!("/api/todos?title={}", title.replace(' ', "+")))
        .send()
        .await;
    response.assert_status(StatusCode::OK);
    response.json().unwrap()
}

#[tokio::test]
async fn test_add_and_list() {
    let client = client();
    let first = add(&client, "Write docs").await;
    let second = add(&client, "Ship it").await;
    assert_eq!((first.id, second.id), (0, 1));
    assert_eq!(first.title, "Write docs");

    let all: Vec<Todo> = client.get("/api/todos").send().await.json().unwrap();
    assert_eq!(all, [first, second.clone()]);

    let one: Todo = client.get("/api/todos/1").send().await.json().unwrap();
    assert_eq!(one, second);
}

#[tokio::test]
async fn test_unknown_todo_is_not_found() {
    let client = client();
    client
        .get("/api/todos/7")
        .send()
        .await
        .assert_status(StatusCode::NOT_FOUND)
        .assert_content_type("application/problem+json");
}

#[tokio::test]
async fn test_complete() {
    let client = client();
    add(&client, "Write docs").await;

    let done: Todo = client
        .post("/api/todos/complete?id=0")
        .send()
        .await
        .json()
        .unwrap();
    assert_eq!(done.state, TodoState::Done);

    let stored: Todo = client.get("/api/todos/0").send().await.json().unwrap();
    assert_eq!(stored.state, TodoState::Done);
}

#[tokio::test]
async fn test_complete_validates_id() {
    let client = client();
    add(&client, "Write docs").await;

    client
        .post("/api/todos/complete?id=3")
        .send()
        .await
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_body_contains("Id")
        .assert_body_contains("No to-do with that id");

    client
        .post("/api/todos/complete?id=three")
        .send()
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    let all: Vec<Todo> = client.get("/api/todos").send().await.json().unwrap();
    assert!(all.iter().all(|todo| todo.state == TodoState::Open));
}
