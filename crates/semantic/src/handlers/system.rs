use crate::error::Result;
use crate::params::Params;
use crate::router::SemanticRouter;
use serde_json::Value;

pub(crate) async fn info(router: &mut SemanticRouter, _params: Params<'_>) -> Result<Value> {
    Ok(router.store.get_server_info().await?)
}

pub(crate) async fn commands(router: &mut SemanticRouter, _params: Params<'_>) -> Result<Value> {
    let commands = router.store.get_commands().await?;
    Ok(serde_json::to_value(commands)?)
}
