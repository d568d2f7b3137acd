/// Engine class names recognized by the `built_in_classes` rule out of the
/// box. Projects extend the list through `[classes]` in `mdfmt.toml`.
pub const BUILT_IN_CLASSES: &[&str] = &[
	"AABB",
	"AcceptDialog",
	"AnimatedSprite2D",
	"AnimatedSprite3D",
	"Animation",
	"AnimationNodeStateMachine",
	"AnimationPlayer",
	"AnimationTree",
	"Area2D",
	"Area3D",
	"Array",
	"ArrayMesh",
	"AStar2D",
	"AStar3D",
	"AStarGrid2D",
	"AudioBusLayout",
	"AudioStream",
	"AudioStreamPlayer",
	"AudioStreamPlayer2D",
	"AudioStreamPlayer3D",
	"BaseButton",
	"Basis",
	"BoxContainer",
	"BoxShape3D",
	"Button",
	"Callable",
	"Camera2D",
	"Camera3D",
	"CanvasItem",
	"CanvasLayer",
	"CanvasModulate",
	"CapsuleShape2D",
	"CapsuleShape3D",
	"CenterContainer",
	"CharacterBody2D",
	"CharacterBody3D",
	"CheckBox",
	"CheckButton",
	"CircleShape2D",
	"CollisionObject2D",
	"CollisionObject3D",
	"CollisionPolygon2D",
	"CollisionShape2D",
	"CollisionShape3D",
	"Color",
	"ColorRect",
	"ConfigFile",
	"Container",
	"Control",
	"CPUParticles2D",
	"CPUParticles3D",
	"Curve",
	"Curve2D",
	"Curve3D",
	"Dictionary",
	"DirAccess",
	"DirectionalLight3D",
	"EditorPlugin",
	"Engine",
	"Environment",
	"FileAccess",
	"FileDialog",
	"Font",
	"GDScript",
	"GPUParticles2D",
	"GPUParticles3D",
	"GridContainer",
	"GridMap",
	"HBoxContainer",
	"HSlider",
	"HTTPRequest",
	"Image",
	"ImageTexture",
	"Input",
	"InputEvent",
	"InputEventAction",
	"InputEventJoypadButton",
	"InputEventKey",
	"InputEventMouse",
	"InputEventMouseButton",
	"InputEventMouseMotion",
	"InputMap",
	"ItemList",
	"JSON",
	"KinematicCollision2D",
	"KinematicCollision3D",
	"Label",
	"Label3D",
	"Light2D",
	"Line2D",
	"LineEdit",
	"MarginContainer",
	"Marker2D",
	"Marker3D",
	"Material",
	"Mesh",
	"MeshInstance2D",
	"MeshInstance3D",
	"MultiMesh",
	"MultiMeshInstance3D",
	"NavigationAgent2D",
	"NavigationAgent3D",
	"NavigationRegion2D",
	"NavigationRegion3D",
	"NinePatchRect",
	"Node",
	"Node2D",
	"Node3D",
	"NodePath",
	"Object",
	"OmniLight3D",
	"OptionButton",
	"PackedByteArray",
	"PackedFloat32Array",
	"PackedInt32Array",
	"PackedScene",
	"PackedStringArray",
	"PackedVector2Array",
	"PackedVector3Array",
	"Panel",
	"PanelContainer",
	"Path2D",
	"Path3D",
	"PathFollow2D",
	"PathFollow3D",
	"PhysicsBody2D",
	"PhysicsBody3D",
	"PhysicsMaterial",
	"Plane",
	"PointLight2D",
	"Polygon2D",
	"PopupMenu",
	"ProgressBar",
	"Projection",
	"Quaternion",
	"RandomNumberGenerator",
	"Range",
	"RayCast2D",
	"RayCast3D",
	"Rect2",
	"Rect2i",
	"RectangleShape2D",
	"RefCounted",
	"RemoteTransform2D",
	"Resource",
	"ResourceLoader",
	"ResourceSaver",
	"RichTextLabel",
	"RID",
	"RigidBody2D",
	"RigidBody3D",
	"SceneTree",
	"SceneTreeTimer",
	"ScrollContainer",
	"Shader",
	"ShaderMaterial",
	"Shape2D",
	"Shape3D",
	"Signal",
	"Skeleton2D",
	"Skeleton3D",
	"Slider",
	"SphereShape3D",
	"SpinBox",
	"SpotLight3D",
	"Sprite2D",
	"Sprite3D",
	"SpriteFrames",
	"StandardMaterial3D",
	"StaticBody2D",
	"StaticBody3D",
	"String",
	"StringName",
	"StyleBox",
	"StyleBoxFlat",
	"SubViewport",
	"TabContainer",
	"TextEdit",
	"Texture",
	"Texture2D",
	"TextureButton",
	"TextureProgressBar",
	"TextureRect",
	"Theme",
	"Thread",
	"TileMap",
	"TileMapLayer",
	"TileSet",
	"Time",
	"Timer",
	"Transform2D",
	"Transform3D",
	"Tree",
	"Tween",
	"VBoxContainer",
	"Vector2",
	"Vector2i",
	"Vector3",
	"Vector3i",
	"Vector4",
	"VideoStreamPlayer",
	"Viewport",
	"ViewportTexture",
	"VisibleOnScreenNotifier2D",
	"VisibleOnScreenNotifier3D",
	"VSlider",
	"WorldEnvironment",
];
