/// Wire representation shared by slash-api and its clients.
///
/// Storage rows live in slash-db; the two are bridged by the mapper in
/// slash-api so either side can evolve without dragging the other along.
pub mod api;
pub mod models;
