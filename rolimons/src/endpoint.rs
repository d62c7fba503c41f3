use strum_macros::Display;

/// Enum for all Rolimons endpoints used by the bot
#[derive(Display, Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Endpoint {
    #[strum(serialize = "/itemapi/itemdetails")]
    ItemDetails,
    #[strum(serialize = "/tradeads/v1/createad")]
    CreateAd,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_render_as_paths() {
        assert_eq!(Endpoint::ItemDetails.to_string(), "/itemapi/itemdetails");
        assert_eq!(Endpoint::CreateAd.to_string(), "/tradeads/v1/createad");
    }
}
