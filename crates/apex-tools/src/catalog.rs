//! The fixed catalog of Apex tools.
//!
//! Each tool is plain data: name, schema and HTTP mapping. The registry turns every descriptor
//! into an MCP `Tool` and a call of the single generic handler, so adding an operation means
//! adding an entry here and nothing else.

use reqwest::Method;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpVerb {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpVerb {
    #[must_use]
    pub fn method(self) -> Method {
        match self {
            Self::Get => Method::GET,
            Self::Post => Method::POST,
            Self::Put => Method::PUT,
            Self::Delete => Method::DELETE,
        }
    }

    /// Writes send a JSON body; reads send query parameters.
    #[must_use]
    pub fn sends_body(self) -> bool {
        matches!(self, Self::Post | Self::Put)
    }
}

/// Semantic type of a tool parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    String,
    Number,
    Boolean,
    StringArray,
    /// ISO-8601 calendar date or date-time; normalized before it is sent.
    Date,
}

/// Where a parameter ends up in the outbound request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamLocation {
    Path,
    Query,
    Body,
}

#[derive(Debug, Clone, Copy)]
pub struct ParamSpec {
    /// Argument name as advertised to MCP clients.
    pub name: &'static str,
    /// Name on the wire, when it differs from `name`.
    pub wire_name: Option<&'static str>,
    pub kind: ParamKind,
    pub location: ParamLocation,
    pub required: bool,
    pub min_length: Option<u64>,
    pub max_length: Option<u64>,
    pub minimum: Option<u64>,
    pub maximum: Option<u64>,
    pub description: &'static str,
}

impl ParamSpec {
    const fn new(
        name: &'static str,
        kind: ParamKind,
        location: ParamLocation,
        description: &'static str,
    ) -> Self {
        Self {
            name,
            wire_name: None,
            kind,
            location,
            required: false,
            min_length: None,
            max_length: None,
            minimum: None,
            maximum: None,
            description,
        }
    }

    /// Path parameters are always required strings.
    const fn path(name: &'static str, description: &'static str) -> Self {
        Self::new(name, ParamKind::String, ParamLocation::Path, description).required()
    }

    const fn query(name: &'static str, kind: ParamKind, description: &'static str) -> Self {
        Self::new(name, kind, ParamLocation::Query, description)
    }

    const fn body(name: &'static str, kind: ParamKind, description: &'static str) -> Self {
        Self::new(name, kind, ParamLocation::Body, description)
    }

    const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    const fn wire(mut self, wire_name: &'static str) -> Self {
        self.wire_name = Some(wire_name);
        self
    }

    const fn length(mut self, min: Option<u64>, max: u64) -> Self {
        self.min_length = min;
        self.max_length = Some(max);
        self
    }

    const fn range(mut self, min: u64, max: u64) -> Self {
        self.minimum = Some(min);
        self.maximum = Some(max);
        self
    }

    #[must_use]
    pub fn wire_name(&self) -> &'static str {
        self.wire_name.unwrap_or(self.name)
    }
}

/// What to do when a write would send an empty JSON object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyPolicy {
    /// Send whatever was supplied.
    Always,
    /// Partial update: an empty body short-circuits with this informational message and no
    /// network call is made.
    SkipWhenEmpty { message: &'static str },
}

#[derive(Debug, Clone, Copy)]
pub struct ToolDescriptor {
    pub name: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub verb: HttpVerb,
    /// Path template; `{param}` placeholders are filled from path parameters.
    pub path: &'static str,
    pub params: &'static [ParamSpec],
    /// Headers this tool adds on top of the auth policy defaults.
    pub extra_headers: &'static [(&'static str, &'static str)],
    pub body_policy: BodyPolicy,
}

impl ToolDescriptor {
    const fn new(
        name: &'static str,
        title: &'static str,
        verb: HttpVerb,
        path: &'static str,
        description: &'static str,
        params: &'static [ParamSpec],
    ) -> Self {
        Self {
            name,
            title,
            description,
            verb,
            path,
            params,
            extra_headers: &[],
            body_policy: BodyPolicy::Always,
        }
    }

    const fn with_headers(mut self, headers: &'static [(&'static str, &'static str)]) -> Self {
        self.extra_headers = headers;
        self
    }

    const fn partial_update(mut self, message: &'static str) -> Self {
        self.body_policy = BodyPolicy::SkipWhenEmpty { message };
        self
    }
}

const MAX_RESULTS_DESCRIPTION: &str = "Maximum results per page (1-200, default: 100)";
const CURSOR_DESCRIPTION: &str = "Pagination cursor from previous response";

const SEARCH_TWEETS_DESCRIPTION: &str = "Advanced Twitter/X search tool for finding tweets with powerful filtering capabilities.\n\n\
Returns tweets matching your criteria, sorted by relevance or time. Expect 2-5 second response times.\n\
Note: API may return duplicate entries - this is normal behavior.\n\n\
Common patterns:\n\
• High-quality content: Set minLikes to 100+ and use includeWords for topics\n\
• Viral analysis: Use minRetweets 50+ with hashtags and top=true\n\
• User analysis: Combine fromUsers with date ranges and engagement filters\n\
• Content exclusion: Use excludeWords to filter out unwanted topics";

const SEARCH_TWEETS_PARAMS: &[ParamSpec] = &[
    ParamSpec::query(
        "count",
        ParamKind::Number,
        "Number of tweets to return. Recommended: 50 for comprehensive results, 20 for quick scans. Max practical limit ~50.",
    ),
    ParamSpec::query(
        "cursor",
        ParamKind::String,
        "Pagination cursor for next batch of results. Use the cursor from previous response to get more results.",
    ),
    ParamSpec::query(
        "endDate",
        ParamKind::Date,
        "End date for search range. Format: YYYY-MM-DD (e.g., '2025-07-30')",
    ),
    ParamSpec::query(
        "excludeWords",
        ParamKind::StringArray,
        "Words to exclude from results. Format: ['word1', 'word2']. Useful for filtering out unwanted topics like ['crypto', 'spam']",
    ),
    ParamSpec::query(
        "fromUsers",
        ParamKind::StringArray,
        "Search tweets FROM these users. Format: ['username'] WITHOUT @ symbol. Example: ['elonmusk', 'OpenAI'] NOT ['@elonmusk', '@OpenAI']",
    ),
    ParamSpec::query(
        "hashtags",
        ParamKind::StringArray,
        "Hashtags to search for. Format: ['tag1', 'tag2'] WITHOUT # symbol. Example: ['AI', 'web3'] NOT ['#AI', '#web3']",
    ),
    ParamSpec::query(
        "includePhrase",
        ParamKind::String,
        "Exact phrase to search for. Will match this exact sequence of words in tweets.",
    ),
    ParamSpec::query(
        "includeWords",
        ParamKind::StringArray,
        "Words that must appear in results. Format: ['word1', 'word2']. Example: ['AI', 'machine learning'] to find tweets about AI/ML",
    ),
    ParamSpec::query(
        "language",
        ParamKind::String,
        "Language filter using ISO codes. Examples: 'en' (English), 'es' (Spanish), 'fr' (French), 'de' (German), 'ja' (Japanese)",
    ),
    ParamSpec::query(
        "list",
        ParamKind::String,
        "Twitter/X list ID to search within. Limits results to tweets from members of this list.",
    ),
    ParamSpec::query(
        "maxId",
        ParamKind::String,
        "Tweet ID upper bound - only return tweets with IDs less than this. Useful for pagination backwards in time.",
    ),
    ParamSpec::query(
        "mentions",
        ParamKind::StringArray,
        "Find tweets mentioning these users. Format: ['username'] WITHOUT @ symbol. Example: ['JensHonack'] NOT ['@JensHonack']",
    ),
    ParamSpec::query(
        "minLikes",
        ParamKind::Number,
        "Minimum likes threshold. Use 50+ for social proof, 100+ for popular content, 1000+ for viral tweets",
    ),
    ParamSpec::query(
        "minReplies",
        ParamKind::Number,
        "Minimum replies threshold. Useful for finding tweets that sparked discussion. Try 10+ for engaged conversations",
    ),
    ParamSpec::query(
        "minRetweets",
        ParamKind::Number,
        "Minimum retweets threshold. Use 10+ for shared content, 50+ for viral reach, 100+ for highly viral",
    ),
    ParamSpec::query(
        "onlyLinks",
        ParamKind::Boolean,
        "Set to true to find only tweets containing URLs. Useful for finding shared articles, resources, or media",
    ),
    ParamSpec::query(
        "onlyOriginal",
        ParamKind::Boolean,
        "Set to true to exclude retweets and quote tweets. Gets only original content from users",
    ),
    ParamSpec::query(
        "onlyReplies",
        ParamKind::Boolean,
        "Set to true to find only reply tweets. Useful for analyzing conversations and discussions",
    ),
    ParamSpec::query(
        "onlyText",
        ParamKind::Boolean,
        "Set to true to exclude tweets with media (photos/videos). Gets text-only content",
    ),
    ParamSpec::query(
        "optionalWords",
        ParamKind::StringArray,
        "Optional words that may appear. Format: ['word1', 'word2']. Tweets may contain any of these words",
    ),
    ParamSpec::query(
        "quoted",
        ParamKind::String,
        "Tweet ID to find quote tweets of. Returns all tweets that quote this specific tweet",
    ),
    ParamSpec::query(
        "sinceId",
        ParamKind::String,
        "Tweet ID lower bound - only return tweets with IDs greater than this. Useful for getting new tweets since last search",
    ),
    ParamSpec::query(
        "startDate",
        ParamKind::Date,
        "Start date for search range. Format: YYYY-MM-DD (e.g., '2025-07-25'). Can search historical tweets from months/years back",
    ),
    ParamSpec::query(
        "top",
        ParamKind::Boolean,
        "Set to true for trending/popular tweets instead of recent. Returns high-engagement content sorted by relevance",
    ),
    ParamSpec::query(
        "toUsers",
        ParamKind::StringArray,
        "Find tweets TO/replying to these users. Format: ['username'] WITHOUT @ symbol. Example: ['elonmusk'] NOT ['@elonmusk']",
    ),
];

const GET_TWEET_PARAMS: &[ParamSpec] = &[ParamSpec::path("id", "Id of the tweet to get.")];

const GENERATE_REPLY_PARAMS: &[ParamSpec] = &[
    ParamSpec::query("text", ParamKind::String, "Text to be replied to.").required(),
    ParamSpec::query(
        "image_urls",
        ParamKind::StringArray,
        "Array of image URLs used as context for the reply. If not provided, the reply will be to only text.",
    )
    .wire("image_url"),
];

const GENERATE_REPLY_TO_TWEET_PARAMS: &[ParamSpec] = &[ParamSpec::path(
    "id",
    "Id of the tweet to generate a reply to",
)];

const POST_TWEET_PARAMS: &[ParamSpec] = &[
    ParamSpec::body(
        "username",
        ParamKind::String,
        "Username of the user posting the tweet.",
    )
    .required(),
    ParamSpec::body("text", ParamKind::String, "Text of the tweet to be posted.").required(),
    ParamSpec::body(
        "image_urls",
        ParamKind::StringArray,
        "Optional image URLs to include with the tweet.",
    ),
];

const POST_REPLY_TO_TWEET_PARAMS: &[ParamSpec] = &[
    ParamSpec::path("tweet_id", "Id of the tweet to reply to."),
    ParamSpec::body("text", ParamKind::String, "Text of the reply to be posted.").required(),
];

const ADD_LIST_MEMBER_PARAMS: &[ParamSpec] = &[
    ParamSpec::path("listId", "ID of the list"),
    ParamSpec::body(
        "userId",
        ParamKind::String,
        "ID of the user to add to the list",
    )
    .required(),
];

const GET_LIST_MEMBERS_PARAMS: &[ParamSpec] = &[
    ParamSpec::path("listId", "ID of the list"),
    ParamSpec::query("cursor", ParamKind::String, CURSOR_DESCRIPTION),
    ParamSpec::query("maxResults", ParamKind::Number, MAX_RESULTS_DESCRIPTION).range(1, 200),
];

const CREATE_LIST_PARAMS: &[ParamSpec] = &[
    ParamSpec::body("name", ParamKind::String, "Name of the list (1-25 characters)")
        .required()
        .length(Some(1), 25),
    ParamSpec::body(
        "description",
        ParamKind::String,
        "Description of the list (max 100 characters)",
    )
    .length(None, 100),
    ParamSpec::body(
        "private",
        ParamKind::Boolean,
        "Whether the list is private (default: false)",
    ),
];

const GET_USER_LISTS_PARAMS: &[ParamSpec] = &[
    ParamSpec::query("cursor", ParamKind::String, CURSOR_DESCRIPTION),
    ParamSpec::query("maxResults", ParamKind::Number, MAX_RESULTS_DESCRIPTION).range(1, 200),
];

const DELETE_LIST_PARAMS: &[ParamSpec] = &[ParamSpec::path("listId", "ID of the list to delete")];

const GET_LIST_PARAMS: &[ParamSpec] = &[ParamSpec::path("listId", "ID of the list to retrieve")];

const UPDATE_LIST_PARAMS: &[ParamSpec] = &[
    ParamSpec::path("listId", "ID of the list to update"),
    ParamSpec::body(
        "name",
        ParamKind::String,
        "New name for the list (1-25 characters)",
    )
    .length(Some(1), 25),
    ParamSpec::body(
        "description",
        ParamKind::String,
        "New description (max 100 characters)",
    )
    .length(None, 100),
    ParamSpec::body("private", ParamKind::Boolean, "Update privacy setting"),
];

const ACCEPT_JSON: &[(&str, &str)] = &[("accept", "application/json")];

/// Every tool exposed by the server, in advertisement order.
pub static CATALOG: &[ToolDescriptor] = &[
    ToolDescriptor::new(
        "get_tweet",
        "Get tweet",
        HttpVerb::Get,
        "/apex/tweet/{id}/details",
        "A tool to get a tweet by its id.",
        GET_TWEET_PARAMS,
    ),
    // The remote API serves reply generation as a read, so this stays a GET with query params.
    ToolDescriptor::new(
        "generate_reply",
        "Generate reply",
        HttpVerb::Get,
        "/apex/reply",
        "Tool that generates a reply to a message.",
        GENERATE_REPLY_PARAMS,
    )
    .with_headers(ACCEPT_JSON),
    ToolDescriptor::new(
        "generate_reply_to_tweet",
        "Generate reply to tweet",
        HttpVerb::Get,
        "/apex/tweet/{id}/reply",
        "A tool to generate a reply suggestion to a tweet. Use if you don't have any context to generate a reply yet.",
        GENERATE_REPLY_TO_TWEET_PARAMS,
    ),
    ToolDescriptor::new(
        "post_tweet",
        "Post tweet",
        HttpVerb::Post,
        "/apex/tweet",
        "Tool that posts a tweet.",
        POST_TWEET_PARAMS,
    ),
    ToolDescriptor::new(
        "post_reply_to_tweet",
        "Post reply to tweet",
        HttpVerb::Post,
        "/apex/tweet/{tweet_id}/reply",
        "Tool that posts a reply to a tweet with input text & optional image.",
        POST_REPLY_TO_TWEET_PARAMS,
    ),
    ToolDescriptor::new(
        "search_tweets",
        "Search tweets",
        HttpVerb::Get,
        "/apex/tweet/search",
        SEARCH_TWEETS_DESCRIPTION,
        SEARCH_TWEETS_PARAMS,
    ),
    ToolDescriptor::new(
        "add_list_member",
        "Add list member",
        HttpVerb::Post,
        "/apex/list/{listId}/member",
        "Add a member to an X/Twitter list.",
        ADD_LIST_MEMBER_PARAMS,
    ),
    ToolDescriptor::new(
        "get_list_members",
        "Get list members",
        HttpVerb::Get,
        "/apex/list/{listId}/member",
        "Get members of a list with pagination support. Returns user objects for each member.",
        GET_LIST_MEMBERS_PARAMS,
    ),
    ToolDescriptor::new(
        "create_list",
        "Create list",
        HttpVerb::Post,
        "/apex/list",
        "Create a new X/Twitter list. Returns the created list object with assigned ID.",
        CREATE_LIST_PARAMS,
    ),
    ToolDescriptor::new(
        "get_user_lists",
        "Get user lists",
        HttpVerb::Get,
        "/apex/list",
        "Get all lists owned by the authenticated user. Returns list objects with metadata.",
        GET_USER_LISTS_PARAMS,
    ),
    ToolDescriptor::new(
        "delete_list",
        "Delete list",
        HttpVerb::Delete,
        "/apex/list/{listId}",
        "Delete an X/Twitter list. This action cannot be undone.",
        DELETE_LIST_PARAMS,
    ),
    ToolDescriptor::new(
        "get_list",
        "Get list",
        HttpVerb::Get,
        "/apex/list/{listId}",
        "Get detailed information about a specific list including member/follower counts.",
        GET_LIST_PARAMS,
    ),
    ToolDescriptor::new(
        "update_list",
        "Update list",
        HttpVerb::Put,
        "/apex/list/{listId}",
        "Update an existing list's properties. Only provided fields will be updated.",
        UPDATE_LIST_PARAMS,
    )
    .partial_update("No fields to update"),
];
