use crate::{
  descriptor::{
    Cardinality, EnumDescriptor, FieldAnnotation, FieldDescriptor, FieldKind, FileDescriptor, MessageDescriptor,
    MethodAnnotation, MethodDescriptor, ScalarKind, ServiceDescriptor,
  },
  generator::{
    GeneratorOptions,
    errors::GenerateResult,
    target::{GeneratedTarget, Target},
  },
  tests::fixtures::json_name,
};

pub(super) const PACKAGE: &str = "test.v1";

pub(super) fn full_name(relative: &str) -> String {
  format!("{PACKAGE}.{relative}")
}

pub(super) fn field(name: &str, kind: FieldKind) -> FieldDescriptor {
  FieldDescriptor::builder()
    .name(name)
    .json_name(json_name(name))
    .kind(kind)
    .build()
}

pub(super) fn string(name: &str) -> FieldDescriptor {
  field(name, FieldKind::Scalar(ScalarKind::String))
}

pub(super) fn message_ref(name: &str, relative: &str) -> FieldDescriptor {
  field(name, FieldKind::Message(full_name(relative)))
}

pub(super) fn enum_ref(name: &str, relative: &str) -> FieldDescriptor {
  field(name, FieldKind::Enum(full_name(relative)))
}

pub(super) fn optional(field: FieldDescriptor) -> FieldDescriptor {
  FieldDescriptor { optional: true, ..field }
}

pub(super) fn list(field: FieldDescriptor) -> FieldDescriptor {
  FieldDescriptor {
    cardinality: Cardinality::RepeatedList,
    ..field
  }
}

pub(super) fn ignored(field: FieldDescriptor) -> FieldDescriptor {
  FieldDescriptor {
    annotation: Some(FieldAnnotation { ignore: Some(true) }),
    ..field
  }
}

pub(super) fn message(relative: &str, fields: Vec<FieldDescriptor>) -> MessageDescriptor {
  let (parent, name) = match relative.rsplit_once('.') {
    Some((parent, name)) => (Some(full_name(parent)), name),
    None => (None, relative),
  };
  MessageDescriptor::builder()
    .full_name(full_name(relative))
    .name(name)
    .package(PACKAGE)
    .maybe_parent(parent)
    .fields(fields)
    .build()
}

pub(super) fn enumeration(name: &str, values: &[&str]) -> EnumDescriptor {
  EnumDescriptor::builder()
    .full_name(full_name(name))
    .name(name)
    .package(PACKAGE)
    .values(values.iter().map(|value| format!("{name}_{value}")).collect())
    .build()
}

pub(super) fn method(name: &str, input: &str, output: &str, resolves: &[&str]) -> MethodDescriptor {
  MethodDescriptor::builder()
    .name(name)
    .full_name(full_name(&format!("Service.{name}")))
    .input(full_name(input))
    .output(full_name(output))
    .annotation(
      MethodAnnotation::builder()
        .resolves(resolves.iter().map(|qualifier| (*qualifier).to_string()).collect())
        .build(),
    )
    .build()
}

pub(super) fn service(name: &str, methods: Vec<MethodDescriptor>) -> ServiceDescriptor {
  let methods = methods
    .into_iter()
    .map(|method| MethodDescriptor {
      full_name: full_name(&format!("{name}.{}", method.name)),
      ..method
    })
    .collect();
  ServiceDescriptor::builder()
    .name(name)
    .full_name(full_name(name))
    .methods(methods)
    .build()
}

pub(super) fn file(messages: Vec<MessageDescriptor>) -> FileDescriptor {
  messages
    .into_iter()
    .fold(FileDescriptor::new("test/v1/test.proto", PACKAGE), FileDescriptor::with_message)
}

/// A file where `Query.posts` lists posts that link back to related posts through `RelatedPosts`.
pub(super) fn posts_file() -> FileDescriptor {
  file(vec![
    message("Query", vec![list(message_ref("posts", "Post"))]),
    message(
      "Post",
      vec![
        string("id"),
        optional(string("subtitle")),
        enum_ref("status", "Status"),
        list(message_ref("related", "Post")),
        ignored(string("internal_note")),
      ],
    ),
    message(
      "RelatedPostsRequest",
      vec![string("post_id"), optional(string("cursor")), ignored(string("trace_id"))],
    ),
    message("RelatedPostsResponse", vec![list(message_ref("posts", "Post"))]),
  ])
  .with_enum(enumeration("Status", &["STATUS_UNSPECIFIED", "STATUS_PUBLISHED"]))
  .with_service(service(
    "PostService",
    vec![method(
      "RelatedPosts",
      "RelatedPostsRequest",
      "RelatedPostsResponse",
      &["Post.related"],
    )],
  ))
}

pub(super) fn generate(file: &FileDescriptor) -> GenerateResult<GeneratedTarget> {
  generate_with(file, &GeneratorOptions::default())
}

pub(super) fn generate_with(file: &FileDescriptor, options: &GeneratorOptions) -> GenerateResult<GeneratedTarget> {
  Target::new(file, options)?.generate()
}
