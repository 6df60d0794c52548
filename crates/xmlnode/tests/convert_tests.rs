use xmlnode::{from_str, to_string, Node, Object, Options};

type TestResult = Result<(), Box<dyn std::error::Error>>;

const PROFILE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<root>
    <user>
        一些额外文本
        <id>12345</id>
        <name>小明</name>
        <nickname>明哥&#128640;</nickname>
        <active>true</active>
        <score>99.99</score>
        <address>
            <city>北京</city>
            <zipcode>100000</zipcode>
            <coordinates>
                <lat>39.9042</lat>
                <lng>116.4074</lng>
            </coordinates>
        </address>
        <tags>程序员</tags>
        <tags>摄影师</tags>
        <tags>旅行者</tags>
        <metadata>
            <created_at>2025-07-09T12:34:56Z</created_at>
            <updated_at/>
            <roles>admin</roles>
            <roles>editor</roles>
            <roles>
                <custom>superuser</custom>
            </roles>
        </metadata>
    </user>
    <posts>
        <id>post-001</id>
        <title>第一篇文章</title>
        <content>这是第一篇文章的内容，包含一些 &lt;b&gt;HTML&lt;/b&gt; 标签。</content>
        <comments>
            <user>小红</user>
            <message>写得很好！</message>
        </comments>
        <comments>
            <user>小刚</user>
            <message>赞&#128077;</message>
        </comments>
    </posts>
    <posts>
        <id>post-002</id>
        <title>第二篇文章</title>
        <content>这是第二篇文章，内容更丰富。</content>
        <comments>
            <item>1</item>
            <item>2</item>
            <item>3</item>
        </comments>
        <comments>
            <item>4</item>
            <item>5</item>
            <item>6</item>
        </comments>
    </posts>
    <config>
        <theme>dark</theme>
        <notifications>
            <email>true</email>
            <sms>false</sms>
            <push>true</push>
        </notifications>
        <experimental>true</experimental>
        <experimental>false</experimental>
        <experimental/>
        <experimental>beta</experimental>
    </config>
    <misc>123</misc>
    <misc>字符串</misc>
    <misc/>
    <misc>
        <nested>
            <array>1</array>
            <array>2</array>
            <array>3</array>
            <array>
                <deep>value</deep>
            </array>
        </nested>
    </misc>
</root>
"#;

fn decode(xml: &str) -> xmlnode::Result<Node> {
    from_str(xml, &Options::default())
}

fn encode(node: &Node) -> xmlnode::Result<String> {
    to_string(node, &Options::default())
}

fn strings(values: &[&str]) -> Node {
    Node::Array(values.iter().map(|v| Node::from(*v)).collect())
}

fn get<'a>(node: &'a Node, path: &[&str]) -> Option<&'a Node> {
    path.iter()
        .try_fold(node, |current, key| current.as_object()?.get(key))
}

#[test]
fn test_profile_document_shape() -> TestResult {
    let node = decode(PROFILE)?;

    assert_eq!(
        get(&node, &["user", "tags"]),
        Some(&strings(&["程序员", "摄影师", "旅行者"]))
    );
    assert_eq!(get(&node, &["user", "nickname"]), Some(&Node::from("明哥🚀")));
    assert_eq!(
        get(&node, &["user", "address", "coordinates", "lat"]),
        Some(&Node::from("39.9042"))
    );
    assert_eq!(get(&node, &["user", "metadata", "updated_at"]), Some(&Node::Null));

    let loose = get(&node, &["user", ""]).and_then(Node::as_string);
    assert_eq!(loose.map(str::trim), Some("一些额外文本"));

    let posts = get(&node, &["posts"]).and_then(Node::as_array);
    assert_eq!(posts.map(|p| p.len()), Some(2));

    let content = posts
        .and_then(|p| p.get(0))
        .and_then(|p| get(p, &["content"]))
        .and_then(Node::as_string)
        .unwrap_or_default();
    assert!(content.contains("<b>HTML</b>"));

    let experimental = get(&node, &["config", "experimental"]);
    let expected = Node::Array(
        [
            Node::from("true"),
            Node::from("false"),
            Node::Null,
            Node::from("beta"),
        ]
        .into_iter()
        .collect(),
    );
    assert_eq!(experimental, Some(&expected));
    Ok(())
}

#[test]
fn test_profile_document_round_trips() -> TestResult {
    let node = decode(PROFILE)?;
    let xml = encode(&node)?;
    assert!(xml.starts_with("<root><user><id>12345</id>"));
    assert!(xml.contains("<updated_at/>"));
    assert!(xml.contains("<tags>程序员</tags><tags>摄影师</tags><tags>旅行者</tags>"));

    let again = decode(&xml)?;
    assert_eq!(again, node);
    Ok(())
}

#[test]
fn test_tags_example() -> TestResult {
    let node = decode("<root><tags>程序员</tags><tags>摄影师</tags><tags>旅行者</tags></root>")?;
    let expected: Object = [("tags", strings(&["程序员", "摄影师", "旅行者"]))]
        .into_iter()
        .collect();
    assert_eq!(node, Node::Object(expected));
    Ok(())
}

#[test]
fn test_decode_rules() -> TestResult {
    assert_eq!(decode("<a></a>")?, Node::from(""));
    assert_eq!(decode("<a>  \n\t </a>")?, Node::from(""));
    assert_eq!(decode("<a/>")?, Node::Null);
    assert_eq!(decode("<a>123</a>")?, Node::from("123"));

    let expected: Object = [("name", Node::from("jack"))].into_iter().collect();
    assert_eq!(decode(r#"<a name="jack"/>"#)?, Node::Object(expected.clone()));
    assert_eq!(decode(r#"<a name="jack"></a>"#)?, Node::Object(expected));

    let expected: Object = [("name", Node::from("")), ("b", Node::from(" 1 2 3 "))]
        .into_iter()
        .collect();
    assert_eq!(
        decode(r#"<a name="">  <b> 1 2 3 </b>   </a>"#)?,
        Node::Object(expected)
    );

    let expected: Object = [("b", Node::from("123")), ("", strings(&["000", "6666"]))]
        .into_iter()
        .collect();
    assert_eq!(decode("<a>000<b>123</b>6666</a>")?, Node::Object(expected));
    Ok(())
}

#[test]
fn test_encode_rules() -> TestResult {
    assert_eq!(encode(&Node::from("123"))?, "<root>123</root>");
    assert_eq!(encode(&Node::Null)?, "<root/>");
    assert_eq!(encode(&Node::from(123))?, "<root>123</root>");
    assert_eq!(encode(&Node::from(1.5))?, "<root>1.5</root>");
    assert_eq!(encode(&Node::from(false))?, "<root>false</root>");

    let object: Object = [("a", Node::from(123))].into_iter().collect();
    assert_eq!(encode(&Node::Object(object))?, "<root><a>123</a></root>");

    let object: Object = [("a", Node::Array([Node::from(1), Node::from(2)].into_iter().collect()))]
        .into_iter()
        .collect();
    assert_eq!(encode(&Node::Object(object))?, "<root><a>1</a><a>2</a></root>");

    let array = Node::Array([Node::from(1), Node::from(2)].into_iter().collect());
    assert_eq!(encode(&array)?, "<root><item>1</item><item>2</item></root>");

    let nested = Node::Array(
        [Node::from(1), Node::Array([Node::from(2)].into_iter().collect())]
            .into_iter()
            .collect(),
    );
    assert_eq!(
        encode(&nested)?,
        "<root><item>1</item><item><item>2</item></item></root>"
    );

    let object: Object = [("", Node::from(123))].into_iter().collect();
    assert_eq!(encode(&Node::Object(object))?, "<root>123</root>");
    Ok(())
}

#[test]
fn test_names_only_affect_encoding() -> TestResult {
    let options = Options::default()
        .with_root_name("data")?
        .with_item_name("entry")?;

    let node = from_str("<anything><x>1</x></anything>", &options)?;
    assert_eq!(node, decode("<other><x>1</x></other>")?);

    let array = Node::Array([Node::from("a")].into_iter().collect());
    assert_eq!(to_string(&array, &options)?, "<data><entry>a</entry></data>");
    Ok(())
}

#[test]
fn test_text_bucket_round_trips() -> TestResult {
    for xml in [
        "<root><b>123</b>000</root>",
        "<root><b>123</b>000<c/>6666</root>",
        "<root><b>1</b><b>2</b>tail</root>",
    ] {
        let node = decode(xml)?;
        assert_eq!(decode(&encode(&node)?)?, node, "{xml}");
    }
    Ok(())
}

#[test]
fn test_split_text_merges_with_sibling() -> TestResult {
    let node = decode("<r><b>x<!---->y</b><b>z</b></r>")?;
    let expected: Object = [("b", strings(&["x", "y", "z"]))].into_iter().collect();
    assert_eq!(node, Node::Object(expected));

    let xml = encode(&node)?;
    assert_eq!(xml, "<root><b>x</b><b>y</b><b>z</b></root>");
    assert_eq!(decode(&xml)?, node);
    Ok(())
}

#[test]
fn test_escaping_round_trips() -> TestResult {
    let xml = r#"<root q="&quot;quoted&quot; &amp; &lt;tagged&gt;"><t>a &lt; b &amp;&amp; c &gt; d</t></root>"#;
    let node = decode(xml)?;
    assert_eq!(get(&node, &["q"]), Some(&Node::from("\"quoted\" & <tagged>")));
    assert_eq!(get(&node, &["t"]), Some(&Node::from("a < b && c > d")));
    assert_eq!(decode(&encode(&node)?)?, node);
    Ok(())
}

#[test]
fn test_invalid_key_is_an_encode_error() {
    let object: Object = [("two words", Node::from(1))].into_iter().collect();
    let err = encode(&Node::Object(object)).err();
    assert!(err.is_some_and(|e| e.is_encode()));
}

#[test]
fn test_malformed_input_is_a_decode_error() {
    for xml in ["", "<a>", "<a></b>", "<a/><b/>", "plain text", "<a>&bogus;</a>"] {
        let err = decode(xml).err();
        assert!(err.is_some_and(|e| e.is_decode()), "{xml:?}");
    }
}

#[test]
fn test_file_round_trip() -> TestResult {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("profile.xml");
    let options = Options::default();

    let node = decode(PROFILE)?;
    xmlnode::to_file(&node, &path, &options)?;
    let reread = xmlnode::from_file(&path, &options)?;
    assert_eq!(reread, node);
    Ok(())
}

#[cfg(feature = "serde")]
#[test]
fn test_node_to_json() -> TestResult {
    let node = decode("<root><n>1</n><flag/><list>a</list><list>b</list></root>")?;
    let json = serde_json::to_string(&node)?;
    assert_eq!(json, r#"{"n":"1","flag":null,"list":["a","b"]}"#);

    let back: Node = serde_json::from_str(&json)?;
    assert_eq!(back, node);
    Ok(())
}

#[cfg(feature = "serde")]
#[test]
fn test_json_integers_encode_exactly() -> TestResult {
    let node: Node =
        serde_json::from_str(r#"{"id": 9007199254740993, "neg": -9223372036854775808, "f": 0.1}"#)?;
    assert_eq!(
        encode(&node)?,
        "<root><id>9007199254740993</id><neg>-9223372036854775808</neg><f>0.1</f></root>"
    );

    let max: Node = serde_json::from_str("18446744073709551615")?;
    assert_eq!(encode(&max)?, "<root>18446744073709551615</root>");
    Ok(())
}
