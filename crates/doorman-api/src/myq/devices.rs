// MyQ device endpoints
//
// Device discovery via `userdevicedetails/get` and state changes via
// `deviceattribute/putdeviceattribute`.

use tracing::debug;

use crate::door::TargetState;
use crate::error::Error;
use crate::myq::client::{
    APPLICATION_ID, CallKind, DEVICE_LIST_PATH, MyQClient, PUT_ATTRIBUTE_PATH,
};
use crate::myq::models::{
    DESIRED_DOOR_STATE_ATTRIBUTE, DeviceDetailsResponse, MyQDevice, PutAttributeRequest,
};

impl MyQClient {
    /// List all devices on the account.
    ///
    /// `GET /api/v4/userdevicedetails/get?appId=..&SecurityToken=..`
    pub async fn list_devices(&self, token: &str) -> Result<Vec<MyQDevice>, Error> {
        let url = self.token_endpoint(DEVICE_LIST_PATH, token)?;
        debug!(path = url.path(), "GET device list");

        let resp = self.http().get(url).send().await.map_err(Error::Transport)?;
        let parsed: DeviceDetailsResponse = self.parse_response(resp, CallKind::Read).await?;
        Ok(parsed.devices)
    }

    /// Request a door state change.
    ///
    /// `PUT /api/v4/deviceattribute/putdeviceattribute` with
    /// `AttributeName = desireddoorstate` and `AttributeValue` 1 (open) or 0 (close).
    pub async fn put_door_state(
        &self,
        token: &str,
        device_id: &str,
        target: TargetState,
    ) -> Result<(), Error> {
        let url = self.token_endpoint(PUT_ATTRIBUTE_PATH, token)?;
        debug!(path = url.path(), device_id, %target, "PUT desired door state");

        let body = PutAttributeRequest {
            application_id: APPLICATION_ID,
            security_token: token,
            device_id,
            attribute_name: DESIRED_DOOR_STATE_ATTRIBUTE,
            attribute_value: target.attribute_value(),
        };

        let resp = self
            .http()
            .put(url)
            .json(&body)
            .send()
            .await
            .map_err(Error::Transport)?;

        Self::check_status(resp, CallKind::Command).await?;
        Ok(())
    }
}
